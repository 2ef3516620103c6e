use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{field_error, AppError, Result};
use crate::features::resource_categories::services::{count_aggregator, tree_navigator};
use crate::features::resources::dtos::{
    CreateResourceDto, ResourceQueryParams, ResourceResponseDto, UpdateResourceDto,
};
use crate::features::resources::models::{Resource, ResourceFields, ResourceStatus};
use crate::features::resources::services::seo::seo_score;
use crate::features::resources::store::{
    PgResourceStore, ResourceFilter, ResourceSession, ResourceStore,
};
use crate::shared::slug::{require_base_slug, resolve_collisions};

/// Service for resources (articles).
///
/// Each write runs in one store session together with the category recounts
/// it causes, so a resource and the counts that include it never disagree.
pub struct ResourceService {
    store: Arc<dyn ResourceStore>,
}

/// Categories whose aggregate can change when a resource moves from `before` to `after`.
///
/// Nothing changes unless the resource was or is published, and the category
/// or the published state differs between the two versions.
pub fn categories_to_recount(
    before: Option<(Option<Uuid>, bool)>,
    after: Option<(Option<Uuid>, bool)>,
) -> Vec<Uuid> {
    let published = |state: &Option<(Option<Uuid>, bool)>| state.is_some_and(|(_, p)| p);
    if before == after || !(published(&before) || published(&after)) {
        return Vec::new();
    }

    [before, after]
        .into_iter()
        .flatten()
        .filter_map(|(category_id, _)| category_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn counted(fields: &ResourceFields) -> (Option<Uuid>, bool) {
    (fields.category_id, fields.status == ResourceStatus::Published)
}

async fn require(session: &mut dyn ResourceSession, id: Uuid) -> Result<Resource> {
    session
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resource with id {} not found", id)))
}

async fn assign_slug(
    session: &mut dyn ResourceSession,
    explicit: Option<&str>,
    fallback: &str,
    current_id: Option<Uuid>,
) -> Result<String> {
    let base = require_base_slug(explicit, fallback)?;
    let collisions = session.slug_collisions(&base, current_id).await?;
    Ok(resolve_collisions(&base, collisions))
}

async fn ensure_category_exists(
    session: &mut dyn ResourceSession,
    category_id: Option<Uuid>,
) -> Result<()> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    match session.categories().find(category_id).await? {
        Some(_) => Ok(()),
        None => Err(field_error(
            "category_id",
            "not_found",
            format!("Category {} does not exist", category_id),
        )),
    }
}

/// Recount the given categories and their ancestors in the caller's session.
async fn recount(session: &mut dyn ResourceSession, category_ids: Vec<Uuid>) -> Result<()> {
    for category_id in category_ids {
        let categories = session.categories();
        if categories.find(category_id).await?.is_none() {
            // Deleted since; nothing left to count
            continue;
        }
        let count = count_aggregator::recount(categories, category_id).await?;
        tracing::debug!("Category {} now counts {} resources", category_id, count);
    }
    Ok(())
}

fn require_title(fields: &ResourceFields) -> Result<()> {
    if fields.title.is_empty() {
        return Err(field_error("title", "required", "Title is required"));
    }
    Ok(())
}

impl ResourceService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgResourceStore::new(pool)))
    }

    pub async fn create(&self, dto: CreateResourceDto) -> Result<ResourceResponseDto> {
        dto.validate()?;
        let explicit_slug = dto.slug.clone();
        let mut fields = dto.into_fields();
        require_title(&fields)?;

        let mut session = self.store.begin().await?;
        ensure_category_exists(session.as_mut(), fields.category_id).await?;
        fields.slug = assign_slug(
            session.as_mut(),
            explicit_slug.as_deref(),
            &fields.title,
            None,
        )
        .await?;
        fields.stamp_publication(Utc::now());
        let score = seo_score(&fields);

        let resource = session.insert(&fields, score).await?;
        recount(
            session.as_mut(),
            categories_to_recount(None, Some(counted(&fields))),
        )
        .await?;
        session.commit().await?;

        tracing::info!(
            "Resource created: id={}, slug={}, status={}, seo_score={}",
            resource.id,
            resource.slug,
            resource.status,
            resource.seo_score
        );
        Ok(resource.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpdateResourceDto) -> Result<ResourceResponseDto> {
        dto.validate()?;
        let mut session = self.store.begin().await?;
        let current = require(session.as_mut(), id).await?;
        let before = counted(&current.fields());

        let explicit_slug = dto.slug.clone();
        let mut fields = current.fields();
        dto.apply_to(&mut fields);
        require_title(&fields)?;
        if fields.category_id != current.category_id {
            ensure_category_exists(session.as_mut(), fields.category_id).await?;
        }
        if let Some(slug) = explicit_slug.as_deref() {
            fields.slug = assign_slug(session.as_mut(), Some(slug), &fields.title, Some(id)).await?;
        }
        fields.stamp_publication(Utc::now());
        let score = seo_score(&fields);

        let resource = session
            .update(id, &fields, score)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource with id {} not found", id)))?;
        recount(
            session.as_mut(),
            categories_to_recount(Some(before), Some(counted(&fields))),
        )
        .await?;
        session.commit().await?;

        tracing::info!(
            "Resource updated: id={}, slug={}, status={}, seo_score={}",
            resource.id,
            resource.slug,
            resource.status,
            resource.seo_score
        );
        Ok(resource.into())
    }

    /// Soft-delete a resource
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut session = self.store.begin().await?;
        let current = require(session.as_mut(), id).await?;

        if !session.soft_delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Resource with id {} not found",
                id
            )));
        }
        recount(
            session.as_mut(),
            categories_to_recount(Some(counted(&current.fields())), None),
        )
        .await?;
        session.commit().await?;

        tracing::info!("Resource deleted: id={}, slug={}", id, current.slug);
        Ok(())
    }

    /// Get any non-deleted resource (admin view)
    pub async fn get_by_id(&self, id: Uuid) -> Result<ResourceResponseDto> {
        let mut session = self.store.begin().await?;
        Ok(require(session.as_mut(), id).await?.into())
    }

    /// Get a published resource by slug and count the view
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<ResourceResponseDto> {
        let mut session = self.store.begin().await?;
        let resource = session
            .record_view(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource '{}' not found", slug)))?;
        session.commit().await?;
        Ok(resource.into())
    }

    /// Paginated listing. `published_only` forces the status filter for public
    /// callers and keeps inactive subcategories (and everything below them)
    /// out of `include_subcategories`.
    pub async fn list(
        &self,
        params: &ResourceQueryParams,
        published_only: bool,
    ) -> Result<(Vec<ResourceResponseDto>, i64)> {
        let mut session = self.store.begin().await?;

        let category_ids = match params.category_id {
            Some(category_id) if params.include_subcategories => {
                let categories = session.categories();
                let root = categories.find(category_id).await?.ok_or_else(|| {
                    AppError::NotFound(format!("Category with id {} not found", category_id))
                })?;
                Some(tree_navigator::subtree_ids(categories, &root, published_only).await?)
            }
            Some(category_id) => Some(vec![category_id]),
            None => None,
        };
        let filter = ResourceFilter {
            category_ids,
            status: if published_only {
                Some(ResourceStatus::Published)
            } else {
                params.status
            },
            featured: params.featured,
            search: params.search_term(),
            limit: params.limit(),
            offset: params.offset(),
        };

        let (resources, total) = session.list(&filter).await?;
        Ok((
            resources.into_iter().map(ResourceResponseDto::from).collect(),
            total,
        ))
    }
}
