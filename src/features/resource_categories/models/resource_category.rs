use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a resource category (a node in the category tree)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ResourceCategory {
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
    /// Cached aggregate; only the count aggregator writes it
    pub resource_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceCategory {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Fully resolved values for inserting a category (slug and sort order already assigned)
#[derive(Debug, Clone)]
pub struct NewResourceCategory {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Validated partial update. `None` leaves a column untouched.
///
/// `parent_id` is doubly optional: `Some(None)` moves the node to the root.
#[derive(Debug, Clone, Default)]
pub struct ResourceCategoryChanges {
    pub parent_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl ResourceCategoryChanges {
    /// Apply the changes to an in-memory row (used by stores that do not speak SQL).
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn apply_to(self, category: &mut ResourceCategory) {
        if let Some(parent_id) = self.parent_id {
            category.parent_id = parent_id;
        }
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(slug) = self.slug {
            category.slug = slug;
        }
        if let Some(description) = self.description {
            category.description = Some(description);
        }
        if let Some(icon) = self.icon {
            category.icon = Some(icon);
        }
        if let Some(color) = self.color {
            category.color = Some(color);
        }
        if let Some(sort_order) = self.sort_order {
            category.sort_order = sort_order;
        }
        if let Some(is_active) = self.is_active {
            category.is_active = is_active;
        }
        if let Some(is_featured) = self.is_featured {
            category.is_featured = is_featured;
        }
        category.updated_at = Utc::now();
    }
}
