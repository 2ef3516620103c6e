use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Triage state, matching the `inquiry_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "inquiry_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    InProgress,
    Resolved,
    Spam,
}

impl InquiryStatus {
    /// `new -> in_progress -> resolved`, with `spam` reachable from anywhere.
    /// Setting the current status again is a no-op and always allowed.
    pub fn can_transition_to(self, next: InquiryStatus) -> bool {
        use InquiryStatus::*;
        matches!(
            (self, next),
            (_, Spam) | (New, InProgress) | (New, Resolved) | (InProgress, Resolved)
        ) || self == next
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InquiryStatus::New => write!(f, "new"),
            InquiryStatus::InProgress => write!(f, "in_progress"),
            InquiryStatus::Resolved => write!(f, "resolved"),
            InquiryStatus::Spam => write!(f, "spam"),
        }
    }
}

/// Database model for a contact form submission
#[derive(Debug, Clone, FromRow)]
pub struct ContactInquiry {
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
