mod category_dto;

pub use category_dto::{
    category_url, BreadcrumbItemDto, CategoryDetailDto, CategoryResponseDto, CategoryTreeDto,
    CreateCategoryDto, UpdateCategoryDto,
};
