mod resource_dto;

pub use resource_dto::{
    resource_url, CreateResourceDto, ResourceQueryParams, ResourceResponseDto, UpdateResourceDto,
};
