mod inquiry_dto;

pub use inquiry_dto::{
    CreateInquiryDto, InquiryQueryParams, InquiryResponseDto, UpdateInquiryStatusDto,
};
