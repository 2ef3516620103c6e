//! Record store contract for the category tree.
//!
//! Every service operation opens one [`CategorySession`] through
//! [`CategoryStore::begin`], performs its reads and writes on it and calls
//! [`CategorySession::commit`]. Dropping a session without committing
//! discards every write made through it, which is how multi-row operations
//! (deletion, recount cascades) stay all-or-nothing.

mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::{PgCategorySession, PgCategoryStore};

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::resource_categories::models::{
    NewResourceCategory, ResourceCategory, ResourceCategoryChanges,
};
use crate::shared::slug::SlugCollisions;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Open a transactional session.
    async fn begin(&self) -> Result<Box<dyn CategorySession>>;
}

/// One transaction over the category table (and the resource rows it aggregates).
///
/// Soft-deleted categories are invisible to every read.
#[async_trait]
pub trait CategorySession: Send {
    async fn find(&mut self, id: Uuid) -> Result<Option<ResourceCategory>>;

    async fn find_by_slug(&mut self, slug: &str) -> Result<Option<ResourceCategory>>;

    /// Rows using `base` or `base-<n>`, ignoring `exclude_id`.
    async fn slug_collisions(
        &mut self,
        base: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<SlugCollisions>;

    /// True if an active category other than `exclude_id` already uses `name` (case-insensitive).
    async fn name_taken(&mut self, name: &str, exclude_id: Option<Uuid>) -> Result<bool>;

    /// Direct children, active or not, ordered by `sort_order` then `name`.
    async fn children_of(&mut self, id: Uuid) -> Result<Vec<ResourceCategory>>;

    /// Every category, active or not, in display order.
    async fn list_all(&mut self) -> Result<Vec<ResourceCategory>>;

    /// Active categories in display order.
    async fn list_active(&mut self) -> Result<Vec<ResourceCategory>>;

    async fn max_sort_order(&mut self) -> Result<Option<i32>>;

    async fn insert(&mut self, category: NewResourceCategory) -> Result<ResourceCategory>;

    async fn update(&mut self, id: Uuid, changes: ResourceCategoryChanges)
        -> Result<ResourceCategory>;

    /// Point every direct child of `from` at `to`. Returns the number of rows moved.
    async fn reparent_children(&mut self, from: Uuid, to: Option<Uuid>) -> Result<u64>;

    async fn set_resource_count(&mut self, id: Uuid, count: i64) -> Result<()>;

    /// Published, non-deleted resources attached directly to the category.
    async fn count_published_resources(&mut self, category_id: Uuid) -> Result<i64>;

    /// Clear the category reference on every resource attached to it.
    async fn detach_resources(&mut self, category_id: Uuid) -> Result<u64>;

    async fn soft_delete(&mut self, id: Uuid) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;
}
