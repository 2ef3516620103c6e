use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Publishing state, matching the `resource_status` database enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "resource_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceStatus::Draft => write!(f, "draft"),
            ResourceStatus::Published => write!(f, "published"),
            ResourceStatus::Archived => write!(f, "archived"),
        }
    }
}

/// One image in a resource gallery. Only the URL is stored; uploads live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct GalleryItem {
    #[validate(url(message = "Gallery image must be a valid URL"))]
    pub url: String,

    #[validate(length(max = 500, message = "Caption must not exceed 500 characters"))]
    pub caption: Option<String>,

    #[validate(length(max = 255, message = "Alt text must not exceed 255 characters"))]
    pub alt_text: Option<String>,
}

impl GalleryItem {
    pub fn has_alt_text(&self) -> bool {
        self.alt_text
            .as_deref()
            .is_some_and(|alt| !alt.trim().is_empty())
    }
}

/// Database model for a resource (article)
#[derive(Debug, Clone, FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: ResourceStatus,
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub seo_score: i32,
    pub gallery: Json<Vec<GalleryItem>>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// The writable part of the row, as a starting point for an update
    pub fn fields(&self) -> ResourceFields {
        ResourceFields {
            category_id: self.category_id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            featured_image_url: self.featured_image_url.clone(),
            meta_title: self.meta_title.clone(),
            meta_description: self.meta_description.clone(),
            status: self.status,
            is_featured: self.is_featured,
            published_at: self.published_at,
            gallery: self.gallery.0.clone(),
        }
    }

    /// Counts toward category totals
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_published(&self) -> bool {
        self.status == ResourceStatus::Published
    }
}

/// Every column a create or update writes, fully resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceFields {
    pub category_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: ResourceStatus,
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub gallery: Vec<GalleryItem>,
}

impl ResourceFields {
    /// Stamp `published_at` the first time the resource is published.
    pub fn stamp_publication(&mut self, now: DateTime<Utc>) {
        if self.status == ResourceStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_publication_is_stamped_once() {
        let mut fields = ResourceFields {
            status: ResourceStatus::Published,
            ..Default::default()
        };
        let first = Utc::now();
        fields.stamp_publication(first);
        assert_eq!(fields.published_at, Some(first));

        // Archive and republish: the original date stays
        fields.status = ResourceStatus::Archived;
        fields.stamp_publication(Utc::now());
        fields.status = ResourceStatus::Published;
        fields.stamp_publication(first + chrono::Duration::days(3));
        assert_eq!(fields.published_at, Some(first));
    }

    #[test]
    fn test_drafts_are_not_stamped() {
        let mut fields = ResourceFields::default();
        fields.stamp_publication(Utc::now());
        assert_eq!(fields.published_at, None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ResourceStatus::Published).unwrap(),
            r#""published""#
        );
        assert_eq!(ResourceStatus::Archived.to_string(), "archived");
    }

    #[test]
    fn test_blank_alt_text_does_not_count() {
        let item = GalleryItem {
            url: "https://cdn.example.com/a.png".to_string(),
            caption: None,
            alt_text: Some("  ".to_string()),
        };
        assert!(!item.has_alt_text());
    }
}
