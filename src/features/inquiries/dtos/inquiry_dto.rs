use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::inquiries::models::{ContactInquiry, InquiryStatus};
use crate::shared::constants::MAX_PAGE_SIZE;
use crate::shared::types::{default_page, default_page_size};
use crate::shared::validation::PHONE_REGEX;

/// Contact form submission
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateInquiryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must not exceed 255 characters")
    )]
    pub email: String,

    #[validate(
        length(max = 50, message = "Phone must not exceed 50 characters"),
        regex(path = *PHONE_REGEX, message = "Invalid phone number")
    )]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Company must not exceed 255 characters"))]
    pub company: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Subject must be 1-255 characters"))]
    pub subject: String,

    #[validate(length(min = 10, max = 5000, message = "Message must be 10-5000 characters"))]
    pub message: String,

    /// Page the form was submitted from
    #[validate(length(max = 500, message = "Source page must not exceed 500 characters"))]
    pub source_page: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateInquiryStatusDto {
    pub status: InquiryStatus,

    #[validate(length(max = 5000, message = "Notes must not exceed 5000 characters"))]
    pub admin_notes: Option<String>,
}

/// Query params for the admin inquiry list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct InquiryQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub status: Option<InquiryStatus>,
}

impl InquiryQueryParams {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InquiryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub source_page: Option<String>,
    pub status: InquiryStatus,
    pub admin_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContactInquiry> for InquiryResponseDto {
    fn from(i: ContactInquiry) -> Self {
        Self {
            id: i.id,
            name: i.name,
            email: i.email,
            phone: i.phone,
            company: i.company,
            subject: i.subject,
            message: i.message,
            source_page: i.source_page,
            status: i.status,
            admin_notes: i.admin_notes,
            resolved_at: i.resolved_at,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}
