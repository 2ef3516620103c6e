mod contact_inquiry;

pub use contact_inquiry::{ContactInquiry, InquiryStatus};
