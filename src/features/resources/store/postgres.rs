use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ResourceFilter, ResourceSession, ResourceStore};
use crate::core::error::{handle_db_error, Result};
use crate::features::resource_categories::store::{
    CategorySession, PgCategorySession, PgCategoryStore,
};
use crate::features::resources::models::{Resource, ResourceFields};
use crate::shared::slug::{self, SlugCollisions, SlugTable};

const RESOURCE_COLUMNS: &str = "id, category_id, title, slug, excerpt, content, featured_image_url, \
     meta_title, meta_description, status, is_featured, published_at, seo_score, gallery, \
     view_count, created_at, updated_at";

const LIST_FILTER: &str = r#"
    WHERE deleted_at IS NULL
      AND ($1::uuid[] IS NULL OR category_id = ANY($1))
      AND ($2::resource_status IS NULL OR status = $2)
      AND ($3::boolean IS NULL OR is_featured = $3)
      AND ($4::text IS NULL OR title ILIKE $4 OR excerpt ILIKE $4 OR content ILIKE $4)
"#;

/// ILIKE pattern for a search term. `%`, `_` and `\` in the term match literally.
fn search_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// PostgreSQL-backed resource store
#[derive(Clone)]
pub struct PgResourceStore {
    categories: PgCategoryStore,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            categories: PgCategoryStore::new(pool),
        }
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn begin(&self) -> Result<Box<dyn ResourceSession>> {
        let session = self.categories.open().await?;
        Ok(Box::new(PgResourceSession { session }))
    }
}

/// Resource queries on the category session's transaction
pub struct PgResourceSession {
    session: PgCategorySession,
}

#[async_trait]
impl ResourceSession for PgResourceSession {
    async fn find(&mut self, id: Uuid) -> Result<Option<Resource>> {
        let query = format!(
            "SELECT {} FROM resources WHERE id = $1 AND deleted_at IS NULL",
            RESOURCE_COLUMNS
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(self.session.connection())
            .await
            .map_err(handle_db_error)
    }

    async fn record_view(&mut self, slug: &str) -> Result<Option<Resource>> {
        let query = format!(
            r#"
            UPDATE resources
            SET view_count = view_count + 1
            WHERE slug = $1 AND status = 'published' AND deleted_at IS NULL
            RETURNING {}
            "#,
            RESOURCE_COLUMNS
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(slug)
            .fetch_optional(self.session.connection())
            .await
            .map_err(handle_db_error)
    }

    async fn list(&mut self, filter: &ResourceFilter) -> Result<(Vec<Resource>, i64)> {
        let search = filter.search.as_deref().map(search_pattern);

        let count_query = format!("SELECT COUNT(*) FROM resources {}", LIST_FILTER);
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.category_ids)
            .bind(filter.status)
            .bind(filter.featured)
            .bind(&search)
            .fetch_one(self.session.connection())
            .await
            .map_err(handle_db_error)?;

        let query = format!(
            r#"
            SELECT {} FROM resources
            {}
            ORDER BY published_at DESC NULLS LAST, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
            RESOURCE_COLUMNS, LIST_FILTER
        );
        let resources = sqlx::query_as::<_, Resource>(&query)
            .bind(&filter.category_ids)
            .bind(filter.status)
            .bind(filter.featured)
            .bind(&search)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(self.session.connection())
            .await
            .map_err(handle_db_error)?;

        Ok((resources, total))
    }

    async fn slug_collisions(
        &mut self,
        base: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<SlugCollisions> {
        slug::slug_collisions(self.session.connection(), SlugTable::Resources, base, exclude_id)
            .await
    }

    async fn insert(&mut self, fields: &ResourceFields, seo_score: i32) -> Result<Resource> {
        let query = format!(
            r#"
            INSERT INTO resources
                (category_id, title, slug, excerpt, content, featured_image_url, meta_title,
                 meta_description, status, is_featured, published_at, seo_score, gallery)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            RESOURCE_COLUMNS
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(fields.category_id)
            .bind(&fields.title)
            .bind(&fields.slug)
            .bind(&fields.excerpt)
            .bind(&fields.content)
            .bind(&fields.featured_image_url)
            .bind(&fields.meta_title)
            .bind(&fields.meta_description)
            .bind(fields.status)
            .bind(fields.is_featured)
            .bind(fields.published_at)
            .bind(seo_score)
            .bind(Json(&fields.gallery))
            .fetch_one(self.session.connection())
            .await
            .map_err(handle_db_error)
    }

    async fn update(
        &mut self,
        id: Uuid,
        fields: &ResourceFields,
        seo_score: i32,
    ) -> Result<Option<Resource>> {
        let query = format!(
            r#"
            UPDATE resources
            SET category_id = $2, title = $3, slug = $4, excerpt = $5, content = $6,
                featured_image_url = $7, meta_title = $8, meta_description = $9, status = $10,
                is_featured = $11, published_at = $12, seo_score = $13, gallery = $14,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            RESOURCE_COLUMNS
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .bind(fields.category_id)
            .bind(&fields.title)
            .bind(&fields.slug)
            .bind(&fields.excerpt)
            .bind(&fields.content)
            .bind(&fields.featured_image_url)
            .bind(&fields.meta_title)
            .bind(&fields.meta_description)
            .bind(fields.status)
            .bind(fields.is_featured)
            .bind(fields.published_at)
            .bind(seo_score)
            .bind(Json(&fields.gallery))
            .fetch_optional(self.session.connection())
            .await
            .map_err(handle_db_error)
    }

    async fn soft_delete(&mut self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE resources
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.session.connection())
        .await
        .map_err(handle_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    fn categories(&mut self) -> &mut dyn CategorySession {
        &mut self.session
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        Box::new(self.session).commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern("seo"), "%seo%");
        assert_eq!(search_pattern("100%"), "%100\\%%");
        assert_eq!(search_pattern("snake_case"), "%snake\\_case%");
    }

    #[test]
    fn test_resource_columns_are_distinct() {
        let columns: Vec<&str> = RESOURCE_COLUMNS.split(',').map(str::trim).collect();
        let mut distinct = columns.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(columns.len(), 17);
        assert_eq!(distinct.len(), columns.len());
    }

    #[test]
    fn test_list_filter_excludes_deleted_rows() {
        assert!(LIST_FILTER.contains("deleted_at IS NULL"));
        assert_eq!(LIST_FILTER.matches("$4").count(), 4);
    }
}
