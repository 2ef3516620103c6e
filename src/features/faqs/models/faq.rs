use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for an FAQ category (flat, no hierarchy)
#[derive(Debug, Clone, FromRow)]
pub struct FaqCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for a question/answer entry
#[derive(Debug, Clone, FromRow)]
pub struct Faq {
    pub id: Uuid,
    pub faq_category_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
