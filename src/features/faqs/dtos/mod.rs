mod faq_dto;

pub use faq_dto::{
    group_faqs, CreateFaqCategoryDto, CreateFaqDto, FaqCategoryResponseDto, FaqGroupDto,
    FaqQueryParams, FaqResponseDto, UpdateFaqCategoryDto, UpdateFaqDto,
};
