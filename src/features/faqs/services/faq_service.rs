use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{field_error, handle_db_error, AppError, Result};
use crate::features::faqs::dtos::{
    group_faqs, CreateFaqCategoryDto, CreateFaqDto, FaqCategoryResponseDto, FaqGroupDto,
    FaqResponseDto, UpdateFaqCategoryDto, UpdateFaqDto,
};
use crate::features::faqs::models::{Faq, FaqCategory};
use crate::shared::slug::{assign_unique_slug, SlugTable};

const CATEGORY_COLUMNS: &str =
    "id, name, slug, description, sort_order, is_active, created_at, updated_at";

const FAQ_COLUMNS: &str = "id, faq_category_id, question, answer, sort_order, is_active, \
     is_featured, created_at, updated_at";

/// Service for the FAQ knowledge base
pub struct FaqService {
    pool: PgPool,
}

impl FaqService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    async fn find_category(&self, id: Uuid) -> Result<FaqCategory> {
        let query = format!(
            "SELECT {} FROM faq_categories WHERE id = $1",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, FaqCategory>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("FAQ category with id {} not found", id)))
    }

    pub async fn list_categories(&self) -> Result<Vec<FaqCategoryResponseDto>> {
        let query = format!(
            "SELECT {} FROM faq_categories ORDER BY sort_order, name",
            CATEGORY_COLUMNS
        );
        let categories = sqlx::query_as::<_, FaqCategory>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    pub async fn get_category(&self, id: Uuid) -> Result<FaqCategoryResponseDto> {
        Ok(self.find_category(id).await?.into())
    }

    pub async fn create_category(
        &self,
        dto: CreateFaqCategoryDto,
    ) -> Result<FaqCategoryResponseDto> {
        dto.validate()?;
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(field_error("name", "required", "Name is required"));
        }

        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;
        let slug = assign_unique_slug(
            &mut tx,
            SlugTable::FaqCategories,
            dto.slug.as_deref(),
            &name,
            None,
        )
        .await?;
        let sort_order = match dto.sort_order {
            Some(sort_order) => sort_order,
            None => {
                sqlx::query_scalar::<_, Option<i32>>("SELECT MAX(sort_order) FROM faq_categories")
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(handle_db_error)?
                    .unwrap_or(0)
                    + 1
            }
        };

        let query = format!(
            r#"
            INSERT INTO faq_categories (name, slug, description, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, FaqCategory>(&query)
            .bind(&name)
            .bind(&slug)
            .bind(&dto.description)
            .bind(sort_order)
            .bind(dto.is_active.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;
        tx.commit().await.map_err(handle_db_error)?;

        tracing::info!(
            "FAQ category created: id={}, slug={}",
            category.id,
            category.slug
        );
        Ok(category.into())
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        dto: UpdateFaqCategoryDto,
    ) -> Result<FaqCategoryResponseDto> {
        dto.validate()?;
        let current = self.find_category(id).await?;
        let name = dto.name.as_deref().map(str::trim).map(str::to_string);
        if name.as_deref() == Some("") {
            return Err(field_error("name", "required", "Name is required"));
        }

        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;
        let slug = match dto.slug.as_deref() {
            Some(slug) => {
                let fallback = name.as_deref().unwrap_or(&current.name);
                Some(
                    assign_unique_slug(
                        &mut tx,
                        SlugTable::FaqCategories,
                        Some(slug),
                        fallback,
                        Some(id),
                    )
                    .await?,
                )
            }
            None => None,
        };

        let query = format!(
            r#"
            UPDATE faq_categories
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                sort_order = COALESCE($5, sort_order),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, FaqCategory>(&query)
            .bind(id)
            .bind(&name)
            .bind(&slug)
            .bind(&dto.description)
            .bind(dto.sort_order)
            .bind(dto.is_active)
            .fetch_optional(&mut *tx)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("FAQ category with id {} not found", id)))?;
        tx.commit().await.map_err(handle_db_error)?;

        tracing::info!(
            "FAQ category updated: id={}, slug={}",
            category.id,
            category.slug
        );
        Ok(category.into())
    }

    /// Delete a category; its FAQs stay and become uncategorized
    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        let detached = sqlx::query(
            "UPDATE faqs SET faq_category_id = NULL, updated_at = NOW() WHERE faq_category_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(handle_db_error)?
        .rows_affected();

        let deleted = sqlx::query("DELETE FROM faq_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "FAQ category with id {} not found",
                id
            )));
        }
        tx.commit().await.map_err(handle_db_error)?;

        tracing::info!("FAQ category deleted: id={}, faqs_detached={}", id, detached);
        Ok(())
    }

    // =========================================================================
    // FAQS
    // =========================================================================

    async fn ensure_category_exists(&self, category_id: Option<Uuid>) -> Result<()> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        match self.find_category(category_id).await {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) => Err(field_error(
                "faq_category_id",
                "not_found",
                format!("FAQ category {} does not exist", category_id),
            )),
            Err(e) => Err(e),
        }
    }

    async fn next_sort_order(&self, category_id: Option<Uuid>) -> Result<i32> {
        let max = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(sort_order) FROM faqs WHERE faq_category_id IS NOT DISTINCT FROM $1",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        Ok(max.unwrap_or(0) + 1)
    }

    /// All FAQs for the admin view, optionally limited to one category
    pub async fn list_faqs(&self, category_id: Option<Uuid>) -> Result<Vec<FaqResponseDto>> {
        let query = format!(
            r#"
            SELECT {} FROM faqs
            WHERE ($1::uuid IS NULL OR faq_category_id = $1)
            ORDER BY sort_order, created_at
            "#,
            FAQ_COLUMNS
        );
        let faqs = sqlx::query_as::<_, Faq>(&query)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(faqs.into_iter().map(Into::into).collect())
    }

    pub async fn get_faq(&self, id: Uuid) -> Result<FaqResponseDto> {
        let query = format!("SELECT {} FROM faqs WHERE id = $1", FAQ_COLUMNS);
        let faq = sqlx::query_as::<_, Faq>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("FAQ with id {} not found", id)))?;

        Ok(faq.into())
    }

    pub async fn create_faq(&self, dto: CreateFaqDto) -> Result<FaqResponseDto> {
        dto.validate()?;
        self.ensure_category_exists(dto.faq_category_id).await?;
        let sort_order = match dto.sort_order {
            Some(sort_order) => sort_order,
            None => self.next_sort_order(dto.faq_category_id).await?,
        };

        let query = format!(
            r#"
            INSERT INTO faqs (faq_category_id, question, answer, sort_order, is_active, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            FAQ_COLUMNS
        );
        let faq = sqlx::query_as::<_, Faq>(&query)
            .bind(dto.faq_category_id)
            .bind(dto.question.trim())
            .bind(dto.answer.trim())
            .bind(sort_order)
            .bind(dto.is_active.unwrap_or(true))
            .bind(dto.is_featured.unwrap_or(false))
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        tracing::info!(
            "FAQ created: id={}, category={:?}",
            faq.id,
            faq.faq_category_id
        );
        Ok(faq.into())
    }

    pub async fn update_faq(&self, id: Uuid, dto: UpdateFaqDto) -> Result<FaqResponseDto> {
        dto.validate()?;
        if let Some(category_id) = dto.faq_category_id {
            self.ensure_category_exists(category_id).await?;
        }

        let query = format!(
            r#"
            UPDATE faqs
            SET faq_category_id = CASE WHEN $2 THEN $3 ELSE faq_category_id END,
                question = COALESCE($4, question),
                answer = COALESCE($5, answer),
                sort_order = COALESCE($6, sort_order),
                is_active = COALESCE($7, is_active),
                is_featured = COALESCE($8, is_featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FAQ_COLUMNS
        );
        let faq = sqlx::query_as::<_, Faq>(&query)
            .bind(id)
            .bind(dto.faq_category_id.is_some())
            .bind(dto.faq_category_id.flatten())
            .bind(dto.question.as_deref().map(str::trim))
            .bind(dto.answer.as_deref().map(str::trim))
            .bind(dto.sort_order)
            .bind(dto.is_active)
            .bind(dto.is_featured)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("FAQ with id {} not found", id)))?;

        tracing::info!("FAQ updated: id={}", faq.id);
        Ok(faq.into())
    }

    pub async fn delete_faq(&self, id: Uuid) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound(format!("FAQ with id {} not found", id)));
        }

        tracing::info!("FAQ deleted: id={}", id);
        Ok(())
    }

    /// Active FAQs grouped by active category, for the public FAQ page
    pub async fn list_public(&self, featured_only: bool) -> Result<Vec<FaqGroupDto>> {
        let category_query = format!(
            "SELECT {} FROM faq_categories WHERE is_active = TRUE ORDER BY sort_order, name",
            CATEGORY_COLUMNS
        );
        let categories = sqlx::query_as::<_, FaqCategory>(&category_query)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        let faq_query = format!(
            r#"
            SELECT {} FROM faqs
            WHERE is_active = TRUE AND ($1 = FALSE OR is_featured = TRUE)
            ORDER BY sort_order, created_at
            "#,
            FAQ_COLUMNS
        );
        let faqs = sqlx::query_as::<_, Faq>(&faq_query)
            .bind(featured_only)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(group_faqs(categories, faqs))
    }
}
