use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::resource_categories::models::ResourceCategory;
use crate::shared::constants::RESOURCE_CATEGORY_URL_PREFIX;
use crate::shared::types::double_option;
use crate::shared::validation::HEX_COLOR_REGEX;

/// Request DTO for creating a resource category
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional explicit slug; derived from `name` when omitted
    #[validate(length(max = 255, message = "Slug must not exceed 255 characters"))]
    pub slug: Option<String>,

    pub parent_id: Option<Uuid>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Icon must not exceed 100 characters"))]
    pub icon: Option<String>,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "Color must be a hex value such as #1a2b3c"))]
    pub color: Option<String>,

    /// Defaults to one past the current maximum
    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,

    pub is_featured: Option<bool>,
}

/// Request DTO for updating a resource category. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 255, message = "Slug must not exceed 255 characters"))]
    pub slug: Option<String>,

    /// `null` moves the category to the root; omit to keep the current parent
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Icon must not exceed 100 characters"))]
    pub icon: Option<String>,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "Color must be a hex value such as #1a2b3c"))]
    pub color: Option<String>,

    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,

    pub is_featured: Option<bool>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub resource_count: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn category_url(slug: &str) -> String {
    format!("{}/{}", RESOURCE_CATEGORY_URL_PREFIX, slug)
}

impl From<ResourceCategory> for CategoryResponseDto {
    fn from(c: ResourceCategory) -> Self {
        Self {
            url: category_url(&c.slug),
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            icon: c.icon,
            color: c.color,
            sort_order: c.sort_order,
            is_active: c.is_active,
            is_featured: c.is_featured,
            resource_count: c.resource_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// One step of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BreadcrumbItemDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub url: String,
}

impl From<&ResourceCategory> for BreadcrumbItemDto {
    fn from(c: &ResourceCategory) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            slug: c.slug.clone(),
            url: category_url(&c.slug),
        }
    }
}

/// Category with its position in the tree
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub hierarchy_level: usize,
    pub breadcrumb: Vec<BreadcrumbItemDto>,
    pub children: Vec<CategoryResponseDto>,
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub url: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: i32,
    pub is_featured: bool,
    pub resource_count: i64,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    fn leaf(category: &ResourceCategory) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            url: category_url(&category.slug),
            description: category.description.clone(),
            icon: category.icon.clone(),
            color: category.color.clone(),
            sort_order: category.sort_order,
            is_featured: category.is_featured,
            resource_count: category.resource_count,
            children: Vec::new(),
        }
    }

    /// Build the tree from a flat list already in display order.
    ///
    /// Only nodes reachable from a root in `categories` are included, so a
    /// category whose parent is missing from the list (e.g. inactive) is left out.
    pub fn build_tree(categories: &[ResourceCategory]) -> Vec<CategoryTreeDto> {
        let mut children_by_parent: HashMap<Uuid, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (idx, category) in categories.iter().enumerate() {
            match category.parent_id {
                Some(parent_id) => children_by_parent.entry(parent_id).or_default().push(idx),
                None => roots.push(idx),
            }
        }

        roots
            .into_iter()
            .map(|idx| Self::build_node(idx, categories, &children_by_parent))
            .collect()
    }

    fn build_node(
        idx: usize,
        categories: &[ResourceCategory],
        children_by_parent: &HashMap<Uuid, Vec<usize>>,
    ) -> CategoryTreeDto {
        let mut node = Self::leaf(&categories[idx]);
        node.children = children_by_parent
            .get(&categories[idx].id)
            .map(|children| {
                children
                    .iter()
                    .map(|&child| Self::build_node(child, categories, children_by_parent))
                    .collect()
            })
            .unwrap_or_default();
        node
    }
}
