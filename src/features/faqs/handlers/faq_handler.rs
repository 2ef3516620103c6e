use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::faqs::dtos::{
    CreateFaqCategoryDto, CreateFaqDto, FaqCategoryResponseDto, FaqGroupDto, FaqQueryParams,
    FaqResponseDto, UpdateFaqCategoryDto, UpdateFaqDto,
};
use crate::features::faqs::services::FaqService;
use crate::shared::types::ApiResponse;

/// Query params for the admin FAQ listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminFaqQuery {
    pub faq_category_id: Option<Uuid>,
}

/// Public FAQ page: active FAQs grouped by category
#[utoipa::path(
    get,
    path = "/api/faqs",
    params(FaqQueryParams),
    responses(
        (status = 200, description = "FAQ groups", body = ApiResponse<Vec<FaqGroupDto>>),
    ),
    tag = "faqs"
)]
pub async fn list_public_faqs(
    State(service): State<Arc<FaqService>>,
    Query(params): Query<FaqQueryParams>,
) -> Result<Json<ApiResponse<Vec<FaqGroupDto>>>> {
    let groups = service.list_public(params.featured).await?;
    Ok(Json(ApiResponse::success(Some(groups), None, None)))
}

/// List every FAQ category
#[utoipa::path(
    get,
    path = "/api/admin/faq-categories",
    responses(
        (status = 200, description = "FAQ categories", body = ApiResponse<Vec<FaqCategoryResponseDto>>),
    ),
    tag = "faqs"
)]
pub async fn list_faq_categories(
    State(service): State<Arc<FaqService>>,
) -> Result<Json<ApiResponse<Vec<FaqCategoryResponseDto>>>> {
    let categories = service.list_categories().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/admin/faq-categories/{id}",
    params(
        ("id" = Uuid, Path, description = "FAQ category ID")
    ),
    responses(
        (status = 200, description = "FAQ category found", body = ApiResponse<FaqCategoryResponseDto>),
        (status = 404, description = "FAQ category not found")
    ),
    tag = "faqs"
)]
pub async fn get_faq_category(
    State(service): State<Arc<FaqService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FaqCategoryResponseDto>>> {
    let category = service.get_category(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/faq-categories",
    request_body = CreateFaqCategoryDto,
    responses(
        (status = 201, description = "FAQ category created", body = ApiResponse<FaqCategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "faqs"
)]
pub async fn create_faq_category(
    State(service): State<Arc<FaqService>>,
    ValidatedJson(dto): ValidatedJson<CreateFaqCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<FaqCategoryResponseDto>>)> {
    let category = service.create_category(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/faq-categories/{id}",
    params(
        ("id" = Uuid, Path, description = "FAQ category ID")
    ),
    request_body = UpdateFaqCategoryDto,
    responses(
        (status = 200, description = "FAQ category updated", body = ApiResponse<FaqCategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "FAQ category not found")
    ),
    tag = "faqs"
)]
pub async fn update_faq_category(
    State(service): State<Arc<FaqService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateFaqCategoryDto>,
) -> Result<Json<ApiResponse<FaqCategoryResponseDto>>> {
    let category = service.update_category(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete an FAQ category; its FAQs become uncategorized
#[utoipa::path(
    delete,
    path = "/api/admin/faq-categories/{id}",
    params(
        ("id" = Uuid, Path, description = "FAQ category ID")
    ),
    responses(
        (status = 200, description = "FAQ category deleted"),
        (status = 404, description = "FAQ category not found")
    ),
    tag = "faqs"
)]
pub async fn delete_faq_category(
    State(service): State<Arc<FaqService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_category(id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}

/// List FAQs in any state
#[utoipa::path(
    get,
    path = "/api/admin/faqs",
    params(AdminFaqQuery),
    responses(
        (status = 200, description = "FAQs", body = ApiResponse<Vec<FaqResponseDto>>),
    ),
    tag = "faqs"
)]
pub async fn list_faqs(
    State(service): State<Arc<FaqService>>,
    Query(query): Query<AdminFaqQuery>,
) -> Result<Json<ApiResponse<Vec<FaqResponseDto>>>> {
    let faqs = service.list_faqs(query.faq_category_id).await?;
    Ok(Json(ApiResponse::success(Some(faqs), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/admin/faqs/{id}",
    params(
        ("id" = Uuid, Path, description = "FAQ ID")
    ),
    responses(
        (status = 200, description = "FAQ found", body = ApiResponse<FaqResponseDto>),
        (status = 404, description = "FAQ not found")
    ),
    tag = "faqs"
)]
pub async fn get_faq(
    State(service): State<Arc<FaqService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FaqResponseDto>>> {
    let faq = service.get_faq(id).await?;
    Ok(Json(ApiResponse::success(Some(faq), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/faqs",
    request_body = CreateFaqDto,
    responses(
        (status = 201, description = "FAQ created", body = ApiResponse<FaqResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "faqs"
)]
pub async fn create_faq(
    State(service): State<Arc<FaqService>>,
    ValidatedJson(dto): ValidatedJson<CreateFaqDto>,
) -> Result<(StatusCode, Json<ApiResponse<FaqResponseDto>>)> {
    let faq = service.create_faq(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(faq), None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/faqs/{id}",
    params(
        ("id" = Uuid, Path, description = "FAQ ID")
    ),
    request_body = UpdateFaqDto,
    responses(
        (status = 200, description = "FAQ updated", body = ApiResponse<FaqResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "FAQ not found")
    ),
    tag = "faqs"
)]
pub async fn update_faq(
    State(service): State<Arc<FaqService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateFaqDto>,
) -> Result<Json<ApiResponse<FaqResponseDto>>> {
    let faq = service.update_faq(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(faq), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/faqs/{id}",
    params(
        ("id" = Uuid, Path, description = "FAQ ID")
    ),
    responses(
        (status = 200, description = "FAQ deleted"),
        (status = 404, description = "FAQ not found")
    ),
    tag = "faqs"
)]
pub async fn delete_faq(
    State(service): State<Arc<FaqService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_faq(id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
