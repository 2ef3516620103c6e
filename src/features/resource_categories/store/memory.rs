//! In-memory implementation of the category store for tests.
//!
//! Sessions hold the store's mutex for their whole lifetime and work on a
//! copy of the state; `commit` swaps the copy in, dropping the session
//! discards it. That gives the same all-or-nothing behaviour as a database
//! transaction. Resource rows are kept in the same state so resource writes
//! and the category recounts they trigger share one session.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use sqlx::types::Json;
use uuid::Uuid;

use super::{CategorySession, CategoryStore};
use crate::core::error::{AppError, Result};
use crate::features::resource_categories::models::{
    NewResourceCategory, ResourceCategory, ResourceCategoryChanges,
};
use crate::features::resources::models::{Resource, ResourceStatus};
use crate::shared::slug::{tally_collisions, SlugCollisions};

#[derive(Debug, Clone)]
struct StoredCategory {
    row: ResourceCategory,
    deleted: bool,
}

/// Resource rows live next to the categories so one session covers both.
#[derive(Debug, Clone)]
pub(crate) struct StoredResource {
    pub(crate) row: Resource,
    pub(crate) deleted: bool,
}

impl StoredResource {
    fn counts_toward(&self, category_id: Uuid) -> bool {
        !self.deleted && self.row.is_published() && self.row.category_id == Some(category_id)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryState {
    categories: HashMap<Uuid, StoredCategory>,
    pub(crate) resources: HashMap<Uuid, StoredResource>,
    /// Simulate a storage failure on the next write (for rollback tests)
    fail_soft_delete: bool,
}

impl MemoryState {
    fn live(&self) -> impl Iterator<Item = &ResourceCategory> {
        self.categories
            .values()
            .filter(|c| !c.deleted)
            .map(|c| &c.row)
    }

    fn sorted(mut rows: Vec<ResourceCategory>) -> Vec<ResourceCategory> {
        rows.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows
    }

    fn live_mut(&mut self, id: Uuid) -> Result<&mut ResourceCategory> {
        self.categories
            .get_mut(&id)
            .filter(|c| !c.deleted)
            .map(|c| &mut c.row)
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCategoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category directly, bypassing every service rule.
    pub async fn seed(&self, name: &str, parent_id: Option<Uuid>) -> ResourceCategory {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let row = ResourceCategory {
            id: Uuid::new_v4(),
            parent_id,
            name: name.to_string(),
            slug: crate::shared::slug::slugify(name),
            description: None,
            icon: None,
            color: None,
            sort_order: state.categories.len() as i32 + 1,
            is_active: true,
            is_featured: false,
            resource_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(
            row.id,
            StoredCategory {
                row: row.clone(),
                deleted: false,
            },
        );
        row
    }

    /// Open a session without boxing it, for stores layered on this one.
    pub(crate) async fn open(&self) -> InMemorySession {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        InMemorySession { guard, working }
    }

    /// Attach a bare resource to a category, returning the resource id.
    pub async fn add_resource(&self, category_id: Option<Uuid>, published: bool) -> Uuid {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let status = if published {
            ResourceStatus::Published
        } else {
            ResourceStatus::Draft
        };
        let row = Resource {
            id,
            category_id,
            title: format!("Resource {}", id),
            slug: id.to_string(),
            excerpt: None,
            content: String::new(),
            featured_image_url: None,
            meta_title: None,
            meta_description: None,
            status,
            is_featured: false,
            published_at: published.then_some(now),
            seo_score: 0,
            gallery: Json(Vec::new()),
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .resources
            .insert(id, StoredResource { row, deleted: false });
        id
    }

    pub async fn set_resource_published(&self, resource_id: Uuid, published: bool) {
        if let Some(resource) = self.state.lock().await.resources.get_mut(&resource_id) {
            resource.row.status = if published {
                ResourceStatus::Published
            } else {
                ResourceStatus::Draft
            };
        }
    }

    pub async fn resource_category(&self, resource_id: Uuid) -> Option<Uuid> {
        self.state
            .lock()
            .await
            .resources
            .get(&resource_id)
            .and_then(|r| r.row.category_id)
    }

    /// Raw row lookup that also sees soft-deleted categories.
    pub async fn raw(&self, id: Uuid) -> Option<(ResourceCategory, bool)> {
        self.state
            .lock()
            .await
            .categories
            .get(&id)
            .map(|c| (c.row.clone(), c.deleted))
    }

    /// Overwrite a parent pointer without any validation (to simulate corrupted data).
    pub async fn force_parent(&self, id: Uuid, parent_id: Option<Uuid>) {
        if let Some(c) = self.state.lock().await.categories.get_mut(&id) {
            c.row.parent_id = parent_id;
        }
    }

    /// Make the next `soft_delete` fail.
    pub async fn fail_next_soft_delete(&self) {
        self.state.lock().await.fail_soft_delete = true;
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategorySession>> {
        Ok(Box::new(self.open().await))
    }
}

pub struct InMemorySession {
    guard: OwnedMutexGuard<MemoryState>,
    pub(crate) working: MemoryState,
}

#[async_trait]
impl CategorySession for InMemorySession {
    async fn find(&mut self, id: Uuid) -> Result<Option<ResourceCategory>> {
        Ok(self.working.live().find(|c| c.id == id).cloned())
    }

    async fn find_by_slug(&mut self, slug: &str) -> Result<Option<ResourceCategory>> {
        Ok(self.working.live().find(|c| c.slug == slug).cloned())
    }

    async fn slug_collisions(
        &mut self,
        base: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<SlugCollisions> {
        let slugs = self
            .working
            .live()
            .filter(|c| Some(c.id) != exclude_id)
            .map(|c| c.slug.as_str());
        Ok(tally_collisions(slugs, base))
    }

    async fn name_taken(&mut self, name: &str, exclude_id: Option<Uuid>) -> Result<bool> {
        let name = name.to_lowercase();
        Ok(self.working.live().any(|c| {
            c.is_active && Some(c.id) != exclude_id && c.name.to_lowercase() == name
        }))
    }

    async fn children_of(&mut self, id: Uuid) -> Result<Vec<ResourceCategory>> {
        let rows = self
            .working
            .live()
            .filter(|c| c.parent_id == Some(id))
            .cloned()
            .collect();
        Ok(MemoryState::sorted(rows))
    }

    async fn list_all(&mut self) -> Result<Vec<ResourceCategory>> {
        Ok(MemoryState::sorted(self.working.live().cloned().collect()))
    }

    async fn list_active(&mut self) -> Result<Vec<ResourceCategory>> {
        let rows = self.working.live().filter(|c| c.is_active).cloned().collect();
        Ok(MemoryState::sorted(rows))
    }

    async fn max_sort_order(&mut self) -> Result<Option<i32>> {
        Ok(self.working.live().map(|c| c.sort_order).max())
    }

    async fn insert(&mut self, category: NewResourceCategory) -> Result<ResourceCategory> {
        if self.working.live().any(|c| c.slug == category.slug) {
            return Err(AppError::Conflict(format!(
                "A record with the same unique value already exists ({})",
                category.slug
            )));
        }

        let now = Utc::now();
        let row = ResourceCategory {
            id: Uuid::new_v4(),
            parent_id: category.parent_id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            icon: category.icon,
            color: category.color,
            sort_order: category.sort_order,
            is_active: category.is_active,
            is_featured: category.is_featured,
            resource_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.working.categories.insert(
            row.id,
            StoredCategory {
                row: row.clone(),
                deleted: false,
            },
        );
        Ok(row)
    }

    async fn update(
        &mut self,
        id: Uuid,
        changes: ResourceCategoryChanges,
    ) -> Result<ResourceCategory> {
        if let Some(slug) = &changes.slug {
            if self.working.live().any(|c| c.id != id && &c.slug == slug) {
                return Err(AppError::Conflict(format!(
                    "A record with the same unique value already exists ({})",
                    slug
                )));
            }
        }

        let row = self.working.live_mut(id)?;
        changes.apply_to(row);
        Ok(row.clone())
    }

    async fn reparent_children(&mut self, from: Uuid, to: Option<Uuid>) -> Result<u64> {
        let mut moved = 0;
        for stored in self.working.categories.values_mut() {
            if !stored.deleted && stored.row.parent_id == Some(from) {
                stored.row.parent_id = to;
                stored.row.updated_at = Utc::now();
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn set_resource_count(&mut self, id: Uuid, count: i64) -> Result<()> {
        self.working.live_mut(id)?.resource_count = count;
        Ok(())
    }

    async fn count_published_resources(&mut self, category_id: Uuid) -> Result<i64> {
        Ok(self
            .working
            .resources
            .values()
            .filter(|r| r.counts_toward(category_id))
            .count() as i64)
    }

    async fn detach_resources(&mut self, category_id: Uuid) -> Result<u64> {
        let mut detached = 0;
        for resource in self.working.resources.values_mut() {
            if resource.row.category_id == Some(category_id) {
                resource.row.category_id = None;
                resource.row.updated_at = Utc::now();
                detached += 1;
            }
        }
        Ok(detached)
    }

    async fn soft_delete(&mut self, id: Uuid) -> Result<()> {
        if self.working.fail_soft_delete {
            // Persist the flag reset so the failure only happens once
            self.guard.fail_soft_delete = false;
            return Err(AppError::Internal("simulated storage failure".to_string()));
        }

        let stored = self
            .working
            .categories
            .get_mut(&id)
            .filter(|c| !c.deleted)
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;
        stored.deleted = true;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let InMemorySession { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
