//! In-memory resource store for tests, sharing state with the in-memory category store.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use super::{ResourceFilter, ResourceSession, ResourceStore};
use crate::core::error::{AppError, Result};
use crate::features::resource_categories::store::memory::{
    InMemoryCategoryStore, InMemorySession, StoredResource,
};
use crate::features::resource_categories::store::CategorySession;
use crate::features::resources::models::{Resource, ResourceFields};
use crate::shared::slug::{tally_collisions, SlugCollisions};

#[derive(Clone, Default)]
pub struct InMemoryResourceStore {
    categories: InMemoryCategoryStore,
}

impl InMemoryResourceStore {
    /// Resource store over the same state as `categories`.
    pub fn new(categories: InMemoryCategoryStore) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn begin(&self) -> Result<Box<dyn ResourceSession>> {
        Ok(Box::new(self.categories.open().await))
    }
}

fn matches_filter(resource: &Resource, filter: &ResourceFilter) -> bool {
    let in_category = match (&filter.category_ids, resource.category_id) {
        (None, _) => true,
        (Some(ids), Some(category_id)) => ids.contains(&category_id),
        (Some(_), None) => false,
    };
    let term = filter.search.as_deref().map(str::to_lowercase);
    let found = term.map_or(true, |term| {
        resource.title.to_lowercase().contains(&term)
            || resource
                .excerpt
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&term))
            || resource.content.to_lowercase().contains(&term)
    });

    in_category
        && filter.status.map_or(true, |s| s == resource.status)
        && filter.featured.map_or(true, |f| f == resource.is_featured)
        && found
}

impl InMemorySession {
    fn live_resources(&self) -> impl Iterator<Item = &Resource> {
        self.working
            .resources
            .values()
            .filter(|r| !r.deleted)
            .map(|r| &r.row)
    }

    fn ensure_slug_free(&self, slug: &str, id: Option<Uuid>) -> Result<()> {
        if self
            .live_resources()
            .any(|r| Some(r.id) != id && r.slug == slug)
        {
            return Err(AppError::Conflict(format!(
                "A record with the same unique value already exists ({})",
                slug
            )));
        }
        Ok(())
    }
}

fn write_fields(row: &mut Resource, fields: &ResourceFields, seo_score: i32) {
    row.category_id = fields.category_id;
    row.title = fields.title.clone();
    row.slug = fields.slug.clone();
    row.excerpt = fields.excerpt.clone();
    row.content = fields.content.clone();
    row.featured_image_url = fields.featured_image_url.clone();
    row.meta_title = fields.meta_title.clone();
    row.meta_description = fields.meta_description.clone();
    row.status = fields.status;
    row.is_featured = fields.is_featured;
    row.published_at = fields.published_at;
    row.seo_score = seo_score;
    row.gallery = Json(fields.gallery.clone());
    row.updated_at = Utc::now();
}

#[async_trait]
impl ResourceSession for InMemorySession {
    async fn find(&mut self, id: Uuid) -> Result<Option<Resource>> {
        Ok(self.live_resources().find(|r| r.id == id).cloned())
    }

    async fn record_view(&mut self, slug: &str) -> Result<Option<Resource>> {
        let stored = self
            .working
            .resources
            .values_mut()
            .find(|r| !r.deleted && r.row.is_published() && r.row.slug == slug);
        Ok(stored.map(|r| {
            r.row.view_count += 1;
            r.row.clone()
        }))
    }

    async fn list(&mut self, filter: &ResourceFilter) -> Result<(Vec<Resource>, i64)> {
        let mut rows: Vec<Resource> = self
            .live_resources()
            .filter(|r| matches_filter(r, filter))
            .cloned()
            .collect();
        // published_at DESC NULLS LAST, created_at DESC
        rows.sort_by_key(|r| {
            (
                r.published_at.is_none(),
                Reverse(r.published_at),
                Reverse(r.created_at),
            )
        });

        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn slug_collisions(
        &mut self,
        base: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<SlugCollisions> {
        let slugs = self
            .live_resources()
            .filter(|r| Some(r.id) != exclude_id)
            .map(|r| r.slug.as_str());
        Ok(tally_collisions(slugs, base))
    }

    async fn insert(&mut self, fields: &ResourceFields, seo_score: i32) -> Result<Resource> {
        self.ensure_slug_free(&fields.slug, None)?;

        let now = Utc::now();
        let mut row = Resource {
            id: Uuid::new_v4(),
            category_id: None,
            title: String::new(),
            slug: String::new(),
            excerpt: None,
            content: String::new(),
            featured_image_url: None,
            meta_title: None,
            meta_description: None,
            status: Default::default(),
            is_featured: false,
            published_at: None,
            seo_score,
            gallery: Json(Vec::new()),
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        write_fields(&mut row, fields, seo_score);
        self.working.resources.insert(
            row.id,
            StoredResource {
                row: row.clone(),
                deleted: false,
            },
        );
        Ok(row)
    }

    async fn update(
        &mut self,
        id: Uuid,
        fields: &ResourceFields,
        seo_score: i32,
    ) -> Result<Option<Resource>> {
        self.ensure_slug_free(&fields.slug, Some(id))?;

        let Some(stored) = self
            .working
            .resources
            .get_mut(&id)
            .filter(|r| !r.deleted)
        else {
            return Ok(None);
        };
        write_fields(&mut stored.row, fields, seo_score);
        Ok(Some(stored.row.clone()))
    }

    async fn soft_delete(&mut self, id: Uuid) -> Result<bool> {
        match self.working.resources.get_mut(&id).filter(|r| !r.deleted) {
            Some(stored) => {
                stored.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn categories(&mut self) -> &mut dyn CategorySession {
        self
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        CategorySession::commit(self).await
    }
}
