use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{CategorySession, CategoryStore};
use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::resource_categories::models::{
    NewResourceCategory, ResourceCategory, ResourceCategoryChanges,
};
use crate::shared::slug::{self, SlugCollisions, SlugTable};

const CATEGORY_COLUMNS: &str = "id, parent_id, name, slug, description, icon, color, sort_order, \
     is_active, is_featured, resource_count, created_at, updated_at";

/// PostgreSQL-backed category store
#[derive(Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a session without boxing it, for stores layered on this one.
    pub(crate) async fn open(&self) -> Result<PgCategorySession> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to open category transaction: {:?}", e);
            AppError::Database(e)
        })?;
        Ok(PgCategorySession { tx })
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategorySession>> {
        Ok(Box::new(self.open().await?))
    }
}

/// A category session backed by one database transaction; dropped = rolled back
pub struct PgCategorySession {
    tx: Transaction<'static, Postgres>,
}

impl PgCategorySession {
    /// The transaction's connection, for queries on tables outside the category tree.
    pub(crate) fn connection(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

#[async_trait]
impl CategorySession for PgCategorySession {
    async fn find(&mut self, id: Uuid) -> Result<Option<ResourceCategory>> {
        let query = format!(
            "SELECT {} FROM resource_categories WHERE id = $1 AND deleted_at IS NULL",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, ResourceCategory>(&query)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(handle_db_error)
    }

    async fn find_by_slug(&mut self, slug: &str) -> Result<Option<ResourceCategory>> {
        let query = format!(
            "SELECT {} FROM resource_categories WHERE slug = $1 AND deleted_at IS NULL",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, ResourceCategory>(&query)
            .bind(slug)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(handle_db_error)
    }

    async fn slug_collisions(
        &mut self,
        base: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<SlugCollisions> {
        slug::slug_collisions(&mut *self.tx, SlugTable::ResourceCategories, base, exclude_id)
            .await
    }

    async fn name_taken(&mut self, name: &str, exclude_id: Option<Uuid>) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM resource_categories
                WHERE LOWER(name) = LOWER($1)
                  AND is_active = TRUE
                  AND deleted_at IS NULL
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(handle_db_error)
    }

    async fn children_of(&mut self, id: Uuid) -> Result<Vec<ResourceCategory>> {
        let query = format!(
            r#"
            SELECT {} FROM resource_categories
            WHERE parent_id = $1 AND deleted_at IS NULL
            ORDER BY sort_order, name
            "#,
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, ResourceCategory>(&query)
            .bind(id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(handle_db_error)
    }

    async fn list_all(&mut self) -> Result<Vec<ResourceCategory>> {
        let query = format!(
            "SELECT {} FROM resource_categories WHERE deleted_at IS NULL ORDER BY sort_order, name",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, ResourceCategory>(&query)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(handle_db_error)
    }

    async fn list_active(&mut self) -> Result<Vec<ResourceCategory>> {
        let query = format!(
            r#"
            SELECT {} FROM resource_categories
            WHERE is_active = TRUE AND deleted_at IS NULL
            ORDER BY sort_order, name
            "#,
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, ResourceCategory>(&query)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(handle_db_error)
    }

    async fn max_sort_order(&mut self) -> Result<Option<i32>> {
        sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(sort_order) FROM resource_categories WHERE deleted_at IS NULL",
        )
        .fetch_one(&mut *self.tx)
        .await
        .map_err(handle_db_error)
    }

    async fn insert(&mut self, category: NewResourceCategory) -> Result<ResourceCategory> {
        let query = format!(
            r#"
            INSERT INTO resource_categories
                (parent_id, name, slug, description, icon, color, sort_order, is_active, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, ResourceCategory>(&query)
            .bind(category.parent_id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(&category.icon)
            .bind(&category.color)
            .bind(category.sort_order)
            .bind(category.is_active)
            .bind(category.is_featured)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(handle_db_error)
    }

    async fn update(
        &mut self,
        id: Uuid,
        changes: ResourceCategoryChanges,
    ) -> Result<ResourceCategory> {
        let query = format!(
            r#"
            UPDATE resource_categories
            SET parent_id = CASE WHEN $2 THEN $3 ELSE parent_id END,
                name = COALESCE($4, name),
                slug = COALESCE($5, slug),
                description = COALESCE($6, description),
                icon = COALESCE($7, icon),
                color = COALESCE($8, color),
                sort_order = COALESCE($9, sort_order),
                is_active = COALESCE($10, is_active),
                is_featured = COALESCE($11, is_featured),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, ResourceCategory>(&query)
            .bind(id)
            .bind(changes.parent_id.is_some())
            .bind(changes.parent_id.flatten())
            .bind(changes.name)
            .bind(changes.slug)
            .bind(changes.description)
            .bind(changes.icon)
            .bind(changes.color)
            .bind(changes.sort_order)
            .bind(changes.is_active)
            .bind(changes.is_featured)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    async fn reparent_children(&mut self, from: Uuid, to: Option<Uuid>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE resource_categories
            SET parent_id = $2, updated_at = NOW()
            WHERE parent_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(from)
        .bind(to)
        .execute(&mut *self.tx)
        .await
        .map_err(handle_db_error)?;

        Ok(result.rows_affected())
    }

    async fn set_resource_count(&mut self, id: Uuid, count: i64) -> Result<()> {
        sqlx::query("UPDATE resource_categories SET resource_count = $2 WHERE id = $1")
            .bind(id)
            .bind(count)
            .execute(&mut *self.tx)
            .await
            .map_err(handle_db_error)?;
        Ok(())
    }

    async fn count_published_resources(&mut self, category_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM resources
            WHERE category_id = $1 AND status = 'published' AND deleted_at IS NULL
            "#,
        )
        .bind(category_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(handle_db_error)
    }

    async fn detach_resources(&mut self, category_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE resources SET category_id = NULL, updated_at = NOW() WHERE category_id = $1",
        )
        .bind(category_id)
        .execute(&mut *self.tx)
        .await
        .map_err(handle_db_error)?;

        Ok(result.rows_affected())
    }

    async fn soft_delete(&mut self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE resource_categories
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(handle_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_columns_are_distinct() {
        let columns: Vec<&str> = CATEGORY_COLUMNS.split(',').map(str::trim).collect();
        let mut distinct = columns.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(columns.len(), 13);
        assert_eq!(distinct.len(), columns.len());
        assert!(!columns.contains(&"deleted_at"));
    }
}
