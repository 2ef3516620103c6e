use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::resource_categories::dtos::{
    BreadcrumbItemDto, CategoryDetailDto, CategoryResponseDto, CreateCategoryDto,
    UpdateCategoryDto,
};
use crate::features::resource_categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing categories
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// List all active resource categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/resource-categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "Flat list, or nested tree when tree=true", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "resource-categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let value = if query.tree {
        serde_json::to_value(service.get_hierarchy().await?)
    } else {
        serde_json::to_value(service.list().await?)
    }
    .map_err(|e| AppError::Internal(format!("Failed to serialize categories: {}", e)))?;

    Ok(Json(ApiResponse::success(Some(value), None, None)))
}

/// Get category by slug, with breadcrumb and direct children
#[utoipa::path(
    get,
    path = "/api/resource-categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "resource-categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Breadcrumb trail from the root down to the category
#[utoipa::path(
    get,
    path = "/api/resource-categories/{slug}/breadcrumb",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Breadcrumb trail", body = ApiResponse<Vec<BreadcrumbItemDto>>),
        (status = 404, description = "Category not found")
    ),
    tag = "resource-categories"
)]
pub async fn get_breadcrumb(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Vec<BreadcrumbItemDto>>>> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(
        Some(category.breadcrumb),
        None,
        None,
    )))
}

/// List every category, including inactive ones
#[utoipa::path(
    get,
    path = "/api/admin/resource-categories",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "resource-categories"
)]
pub async fn admin_list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list_all().await?;
    let total = categories.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(categories),
        None,
        Some(Meta { total }),
    )))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/api/admin/resource-categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "resource-categories"
)]
pub async fn admin_get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Create a resource category
#[utoipa::path(
    post,
    path = "/api/admin/resource-categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Parent category not found"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "resource-categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    ValidatedJson(dto): ValidatedJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let category = service.create_category(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Update a resource category
///
/// Send `"parent_id": null` to move the category to the root.
#[utoipa::path(
    put,
    path = "/api/admin/resource-categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error or cyclic parent"),
        (status = 404, description = "Category or parent not found"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "resource-categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.update_category(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete a resource category (soft delete)
///
/// Children move up one level and attached resources become uncategorized.
#[utoipa::path(
    delete,
    path = "/api/admin/resource-categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    tag = "resource-categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_category(id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}

/// Recompute the resource count of a category and its ancestors
#[utoipa::path(
    post,
    path = "/api/admin/resource-categories/{id}/recount",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Updated resource count", body = ApiResponse<i64>),
        (status = 404, description = "Category not found")
    ),
    tag = "resource-categories"
)]
pub async fn recount_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<i64>>> {
    let count = service.refresh_resource_count(id).await?;
    Ok(Json(ApiResponse::success(Some(count), None, None)))
}
