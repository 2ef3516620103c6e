use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{field_error, handle_db_error, AppError, Result};
use crate::features::inquiries::dtos::{
    CreateInquiryDto, InquiryQueryParams, InquiryResponseDto, UpdateInquiryStatusDto,
};
use crate::features::inquiries::models::ContactInquiry;

const INQUIRY_COLUMNS: &str = "id, name, email, phone, company, subject, message, source_page, \
     status, admin_notes, resolved_at, created_at, updated_at";

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Service for contact form submissions
pub struct InquiryService {
    pool: PgPool,
}

impl InquiryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find(&self, id: Uuid) -> Result<ContactInquiry> {
        let query = format!(
            "SELECT {} FROM contact_inquiries WHERE id = $1",
            INQUIRY_COLUMNS
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Inquiry with id {} not found", id)))
    }

    /// Store a new submission with status `new`
    pub async fn create(&self, dto: CreateInquiryDto) -> Result<InquiryResponseDto> {
        dto.validate()?;

        let query = format!(
            r#"
            INSERT INTO contact_inquiries
                (name, email, phone, company, subject, message, source_page)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            INQUIRY_COLUMNS
        );
        let inquiry = sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(dto.name.trim())
            .bind(dto.email.trim().to_lowercase())
            .bind(trimmed(dto.phone))
            .bind(trimmed(dto.company))
            .bind(dto.subject.trim())
            .bind(dto.message.trim())
            .bind(trimmed(dto.source_page))
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        tracing::info!(
            "Contact inquiry received: id={}, source_page={:?}",
            inquiry.id,
            inquiry.source_page
        );
        Ok(inquiry.into())
    }

    pub async fn list(&self, params: &InquiryQueryParams) -> Result<(Vec<InquiryResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_inquiries WHERE ($1::inquiry_status IS NULL OR status = $1)",
        )
        .bind(params.status)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        let query = format!(
            r#"
            SELECT {} FROM contact_inquiries
            WHERE ($1::inquiry_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            INQUIRY_COLUMNS
        );
        let inquiries = sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(params.status)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok((inquiries.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<InquiryResponseDto> {
        Ok(self.find(id).await?.into())
    }

    /// Move an inquiry along its lifecycle. Resolving stamps `resolved_at`.
    pub async fn update_status(
        &self,
        id: Uuid,
        dto: UpdateInquiryStatusDto,
    ) -> Result<InquiryResponseDto> {
        dto.validate()?;
        let current = self.find(id).await?;
        if !current.status.can_transition_to(dto.status) {
            return Err(field_error(
                "status",
                "invalid_transition",
                format!(
                    "Cannot change status from {} to {}",
                    current.status, dto.status
                ),
            ));
        }

        let query = format!(
            r#"
            UPDATE contact_inquiries
            SET status = $2,
                admin_notes = COALESCE($3, admin_notes),
                resolved_at = CASE
                    WHEN $2 = 'resolved'::inquiry_status THEN COALESCE(resolved_at, NOW())
                    ELSE resolved_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            INQUIRY_COLUMNS
        );
        let inquiry = sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(id)
            .bind(dto.status)
            .bind(&dto.admin_notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Inquiry with id {} not found", id)))?;

        tracing::info!(
            "Inquiry status changed: id={}, {} -> {}",
            id,
            current.status,
            inquiry.status
        );
        Ok(inquiry.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM contact_inquiries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "Inquiry with id {} not found",
                id
            )));
        }

        tracing::info!("Inquiry deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_drops_blank_values() {
        assert_eq!(trimmed(Some("  ".to_string())), None);
        assert_eq!(trimmed(Some(" Acme ".to_string())), Some("Acme".to_string()));
        assert_eq!(trimmed(None), None);
    }
}
