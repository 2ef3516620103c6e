use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{field_error, AppError, Result};
use crate::features::resource_categories::dtos::{
    BreadcrumbItemDto, CategoryDetailDto, CategoryResponseDto, CategoryTreeDto,
    CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::resource_categories::models::{
    NewResourceCategory, ResourceCategory, ResourceCategoryChanges,
};
use crate::features::resource_categories::services::{
    count_aggregator, cycle_guard, slug_assigner, tree_navigator,
};
use crate::features::resource_categories::store::{
    CategorySession, CategoryStore, PgCategoryStore,
};

/// Service for the resource category tree.
///
/// Every public operation runs in one store session and commits at the end;
/// validation happens before the first write, so a rejected request leaves
/// no trace.
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

async fn require(session: &mut dyn CategorySession, id: Uuid) -> Result<ResourceCategory> {
    session
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
}

async fn require_parent(session: &mut dyn CategorySession, parent_id: Uuid) -> Result<()> {
    session
        .find(parent_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Parent category {} not found", parent_id)))
}

fn normalized_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(field_error("name", "required", "Name is required"));
    }
    Ok(name.to_string())
}

async fn ensure_name_available(
    session: &mut dyn CategorySession,
    name: &str,
    exclude_id: Option<Uuid>,
) -> Result<()> {
    if session.name_taken(name, exclude_id).await? {
        return Err(field_error(
            "name",
            "unique",
            format!("A category named '{}' already exists", name),
        ));
    }
    Ok(())
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgCategoryStore::new(pool)))
    }

    /// List all active categories (flat list)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let mut session = self.store.begin().await?;
        let categories = session.list_active().await?;
        Ok(categories.into_iter().map(CategoryResponseDto::from).collect())
    }

    /// List every category including inactive ones (admin view)
    pub async fn list_all(&self) -> Result<Vec<CategoryResponseDto>> {
        let mut session = self.store.begin().await?;
        let categories = session.list_all().await?;
        Ok(categories.into_iter().map(CategoryResponseDto::from).collect())
    }

    /// Full active tree, roots and children in display order
    pub async fn get_hierarchy(&self) -> Result<Vec<CategoryTreeDto>> {
        let mut session = self.store.begin().await?;
        let categories = session.list_active().await?;
        Ok(CategoryTreeDto::build_tree(&categories))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        let mut session = self.store.begin().await?;
        Ok(require(session.as_mut(), id).await?.into())
    }

    /// Get an active category by slug, with its tree position
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryDetailDto> {
        let mut session = self.store.begin().await?;
        let category = session
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))?;

        let breadcrumb = tree_navigator::breadcrumb(session.as_mut(), &category).await?;
        let children = session
            .children_of(category.id)
            .await?
            .into_iter()
            .filter(|c| c.is_active)
            .map(CategoryResponseDto::from)
            .collect();

        Ok(CategoryDetailDto {
            hierarchy_level: breadcrumb.len() - 1,
            breadcrumb,
            children,
            category: category.into(),
        })
    }

    pub async fn get_breadcrumb(&self, id: Uuid) -> Result<Vec<BreadcrumbItemDto>> {
        let mut session = self.store.begin().await?;
        let category = require(session.as_mut(), id).await?;
        tree_navigator::breadcrumb(session.as_mut(), &category).await
    }

    pub async fn create_category(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        dto.validate()?;
        let name = normalized_name(&dto.name)?;

        let is_active = dto.is_active.unwrap_or(true);

        let mut session = self.store.begin().await?;
        if is_active {
            ensure_name_available(session.as_mut(), &name, None).await?;
        }
        if let Some(parent_id) = dto.parent_id {
            require_parent(session.as_mut(), parent_id).await?;
        }

        let slug = slug_assigner::assign_slug(session.as_mut(), dto.slug.as_deref(), &name, None)
            .await?;
        let sort_order = match dto.sort_order {
            Some(sort_order) => sort_order,
            None => session.max_sort_order().await?.unwrap_or(0) + 1,
        };

        let created = session
            .insert(NewResourceCategory {
                parent_id: dto.parent_id,
                name,
                slug,
                description: dto.description,
                icon: dto.icon,
                color: dto.color,
                sort_order,
                is_active,
                is_featured: dto.is_featured.unwrap_or(false),
            })
            .await?;

        let resource_count = count_aggregator::recount(session.as_mut(), created.id).await?;
        session.commit().await?;

        tracing::info!(
            "Resource category created: id={}, slug={}, parent={:?}",
            created.id,
            created.slug,
            created.parent_id
        );

        Ok(ResourceCategory {
            resource_count,
            ..created
        }
        .into())
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        dto: UpdateCategoryDto,
    ) -> Result<CategoryResponseDto> {
        dto.validate()?;

        let mut session = self.store.begin().await?;
        let current = require(session.as_mut(), id).await?;
        let mut changes = ResourceCategoryChanges::default();

        if let Some(name) = dto.name.as_deref() {
            let name = normalized_name(name)?;
            let becomes_active = dto.is_active.unwrap_or(current.is_active);
            if becomes_active && !name.eq_ignore_ascii_case(&current.name) {
                ensure_name_available(session.as_mut(), &name, Some(id)).await?;
            }
            changes.name = Some(name);
        } else if dto.is_active == Some(true) && !current.is_active {
            // Reactivating must not produce two active categories with one name
            ensure_name_available(session.as_mut(), &current.name, Some(id)).await?;
        }

        if let Some(slug) = dto.slug.as_deref() {
            let fallback = changes.name.as_deref().unwrap_or(&current.name);
            changes.slug =
                Some(slug_assigner::assign_slug(session.as_mut(), Some(slug), fallback, Some(id)).await?);
        }

        if let Some(new_parent) = dto.parent_id {
            if let Some(parent_id) = new_parent {
                if parent_id == id {
                    return Err(field_error(
                        "parent_id",
                        "self_parent",
                        "A category cannot be its own parent",
                    ));
                }
                require_parent(session.as_mut(), parent_id).await?;
                if cycle_guard::would_create_cycle(session.as_mut(), id, parent_id).await? {
                    return Err(field_error(
                        "parent_id",
                        "cycle",
                        "The selected parent is a descendant of this category",
                    ));
                }
            }
            changes.parent_id = Some(new_parent);
        }

        changes.description = dto.description;
        changes.icon = dto.icon;
        changes.color = dto.color;
        changes.sort_order = dto.sort_order;
        changes.is_active = dto.is_active;
        changes.is_featured = dto.is_featured;

        let updated = session.update(id, changes).await?;
        let resource_count = count_aggregator::recount(session.as_mut(), id).await?;

        // The old parent chain lost this subtree
        if let Some(old_parent) = current.parent_id {
            if updated.parent_id != Some(old_parent) {
                count_aggregator::recount(session.as_mut(), old_parent).await?;
            }
        }
        session.commit().await?;

        tracing::info!(
            "Resource category updated: id={}, slug={}, parent={:?}",
            updated.id,
            updated.slug,
            updated.parent_id
        );

        Ok(ResourceCategory {
            resource_count,
            ..updated
        }
        .into())
    }

    /// Soft-delete a category.
    ///
    /// Children move up to the deleted node's parent (or become roots) and
    /// attached resources become uncategorized, all in the same session.
    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        let mut session = self.store.begin().await?;
        let category = require(session.as_mut(), id).await?;

        let moved = session.reparent_children(id, category.parent_id).await?;
        let detached = session.detach_resources(id).await?;
        session.soft_delete(id).await?;

        if let Some(parent_id) = category.parent_id {
            count_aggregator::recount(session.as_mut(), parent_id).await?;
        }
        session.commit().await?;

        tracing::info!(
            "Resource category deleted: id={}, children_moved={}, resources_detached={}",
            id,
            moved,
            detached
        );
        Ok(())
    }

    /// Recount one category and its ancestors, e.g. after a resource was published.
    pub async fn refresh_resource_count(&self, id: Uuid) -> Result<i64> {
        let mut session = self.store.begin().await?;
        require(session.as_mut(), id).await?;
        let count = count_aggregator::recount(session.as_mut(), id).await?;
        session.commit().await?;
        Ok(count)
    }
}
