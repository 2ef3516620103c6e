use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::resources::models::{GalleryItem, Resource, ResourceFields, ResourceStatus};
use crate::features::resources::services::seo::{reading_time_minutes, seo_grade, SeoGrade};
use crate::shared::constants::{MAX_PAGE_SIZE, RESOURCE_URL_PREFIX};
use crate::shared::types::{default_page, default_page_size, double_option};

/// Query params for listing resources
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ResourceQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub category_id: Option<Uuid>,

    /// Also match resources in any category below `category_id`
    #[serde(default)]
    pub include_subcategories: bool,

    /// Ignored on public endpoints (always `published` there)
    pub status: Option<ResourceStatus>,

    pub featured: Option<bool>,

    /// Search in title, excerpt and content
    pub search: Option<String>,
}

impl ResourceQueryParams {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Trimmed search text, `None` when blank
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Request DTO for creating a resource
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateResourceDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional explicit slug; derived from `title` when omitted
    #[validate(length(max = 255, message = "Slug must not exceed 255 characters"))]
    pub slug: Option<String>,

    pub category_id: Option<Uuid>,

    #[validate(length(max = 1000, message = "Excerpt must not exceed 1000 characters"))]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub content: String,

    #[validate(url(message = "Featured image must be a valid URL"))]
    pub featured_image_url: Option<String>,

    #[validate(length(max = 255, message = "Meta title must not exceed 255 characters"))]
    pub meta_title: Option<String>,

    #[validate(length(max = 500, message = "Meta description must not exceed 500 characters"))]
    pub meta_description: Option<String>,

    pub status: Option<ResourceStatus>,

    pub is_featured: Option<bool>,

    #[validate(nested)]
    #[serde(default)]
    pub gallery: Vec<GalleryItem>,
}

impl CreateResourceDto {
    /// Resolved fields with the slug still unassigned
    pub fn into_fields(self) -> ResourceFields {
        ResourceFields {
            category_id: self.category_id,
            title: self.title.trim().to_string(),
            slug: String::new(),
            excerpt: self.excerpt,
            content: self.content,
            featured_image_url: self.featured_image_url,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            status: self.status.unwrap_or_default(),
            is_featured: self.is_featured.unwrap_or(false),
            published_at: None,
            gallery: self.gallery,
        }
    }
}

/// Request DTO for updating a resource. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 255, message = "Slug must not exceed 255 characters"))]
    pub slug: Option<String>,

    /// `null` makes the resource uncategorized
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,

    #[validate(length(max = 1000, message = "Excerpt must not exceed 1000 characters"))]
    pub excerpt: Option<String>,

    pub content: Option<String>,

    /// `null` removes the featured image
    #[validate(url(message = "Featured image must be a valid URL"))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub featured_image_url: Option<Option<String>>,

    #[validate(length(max = 255, message = "Meta title must not exceed 255 characters"))]
    pub meta_title: Option<String>,

    #[validate(length(max = 500, message = "Meta description must not exceed 500 characters"))]
    pub meta_description: Option<String>,

    pub status: Option<ResourceStatus>,

    pub is_featured: Option<bool>,

    /// Replaces the whole gallery when present
    #[validate(nested)]
    pub gallery: Option<Vec<GalleryItem>>,
}

impl UpdateResourceDto {
    /// Merge into the current fields. The slug is handled by the caller.
    pub fn apply_to(self, fields: &mut ResourceFields) {
        if let Some(category_id) = self.category_id {
            fields.category_id = category_id;
        }
        if let Some(title) = self.title {
            fields.title = title.trim().to_string();
        }
        if let Some(excerpt) = self.excerpt {
            fields.excerpt = Some(excerpt);
        }
        if let Some(content) = self.content {
            fields.content = content;
        }
        if let Some(featured_image_url) = self.featured_image_url {
            fields.featured_image_url = featured_image_url;
        }
        if let Some(meta_title) = self.meta_title {
            fields.meta_title = Some(meta_title);
        }
        if let Some(meta_description) = self.meta_description {
            fields.meta_description = Some(meta_description);
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(is_featured) = self.is_featured {
            fields.is_featured = is_featured;
        }
        if let Some(gallery) = self.gallery {
            fields.gallery = gallery;
        }
    }
}

pub fn resource_url(slug: &str) -> String {
    format!("{}/{}", RESOURCE_URL_PREFIX, slug)
}

/// Response DTO for resource
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResourceResponseDto {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: ResourceStatus,
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub seo_score: i32,
    pub seo_grade: SeoGrade,
    pub reading_time_minutes: u32,
    pub gallery: Vec<GalleryItem>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponseDto {
    fn from(r: Resource) -> Self {
        Self {
            url: resource_url(&r.slug),
            seo_grade: seo_grade(r.seo_score),
            reading_time_minutes: reading_time_minutes(&r.content),
            id: r.id,
            category_id: r.category_id,
            title: r.title,
            slug: r.slug,
            excerpt: r.excerpt,
            content: r.content,
            featured_image_url: r.featured_image_url,
            meta_title: r.meta_title,
            meta_description: r.meta_description,
            status: r.status,
            is_featured: r.is_featured,
            published_at: r.published_at,
            seo_score: r.seo_score,
            gallery: r.gallery.0,
            view_count: r.view_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_merges_only_present_fields() {
        let mut fields = ResourceFields {
            title: "Old".to_string(),
            category_id: Some(Uuid::new_v4()),
            featured_image_url: Some("https://cdn.example.com/a.png".to_string()),
            ..Default::default()
        };
        let dto: UpdateResourceDto = serde_json::from_str(
            r#"{"title": " New title ", "category_id": null, "status": "published"}"#,
        )
        .unwrap();
        dto.apply_to(&mut fields);

        assert_eq!(fields.title, "New title");
        assert_eq!(fields.category_id, None);
        assert_eq!(fields.status, ResourceStatus::Published);
        assert!(fields.featured_image_url.is_some());
    }

    #[test]
    fn test_gallery_items_are_validated() {
        let dto = CreateResourceDto {
            title: "Gallery".to_string(),
            gallery: vec![GalleryItem {
                url: "not a url".to_string(),
                caption: None,
                alt_text: None,
            }],
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_search_term_ignores_blank() {
        let params = ResourceQueryParams {
            search: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), None);

        let params = ResourceQueryParams {
            search: Some(" seo ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search_term().as_deref(), Some("seo"));
    }

    #[test]
    fn test_paging_is_clamped() {
        let params = ResourceQueryParams {
            page: 0,
            page_size: 1000,
            ..Default::default()
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 0);

        let params = ResourceQueryParams {
            page: 3,
            page_size: 20,
            ..Default::default()
        };
        assert_eq!(params.offset(), 40);
    }
}
