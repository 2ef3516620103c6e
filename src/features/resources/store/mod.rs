//! Record store contract for resources.
//!
//! A [`ResourceSession`] is layered on a category session over the same
//! transaction: resource writes and the category recounts they trigger
//! commit or roll back together.

mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgResourceStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::resource_categories::store::CategorySession;
use crate::features::resources::models::{Resource, ResourceFields, ResourceStatus};
use crate::shared::slug::SlugCollisions;

/// Resolved listing filter. `None` means "don't filter on this".
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub category_ids: Option<Vec<Uuid>>,
    pub status: Option<ResourceStatus>,
    pub featured: Option<bool>,
    /// Case-insensitive substring of title, excerpt or content
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Open a transactional session.
    async fn begin(&self) -> Result<Box<dyn ResourceSession>>;
}

/// One transaction over resources and the category tree.
///
/// Soft-deleted resources are invisible to every read.
#[async_trait]
pub trait ResourceSession: Send {
    async fn find(&mut self, id: Uuid) -> Result<Option<Resource>>;

    /// Published resource by slug, with its view count incremented.
    async fn record_view(&mut self, slug: &str) -> Result<Option<Resource>>;

    /// One page of matches, newest publication first, plus the total match count.
    async fn list(&mut self, filter: &ResourceFilter) -> Result<(Vec<Resource>, i64)>;

    /// Rows using `base` or `base-<n>`, ignoring `exclude_id`.
    async fn slug_collisions(
        &mut self,
        base: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<SlugCollisions>;

    async fn insert(&mut self, fields: &ResourceFields, seo_score: i32) -> Result<Resource>;

    async fn update(
        &mut self,
        id: Uuid,
        fields: &ResourceFields,
        seo_score: i32,
    ) -> Result<Option<Resource>>;

    /// Returns false if there was no live resource with that id.
    async fn soft_delete(&mut self, id: Uuid) -> Result<bool>;

    /// The category tree, inside the same transaction.
    fn categories(&mut self) -> &mut dyn CategorySession;

    async fn commit(self: Box<Self>) -> Result<()>;
}
