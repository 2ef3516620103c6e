use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::resources::dtos::{
    CreateResourceDto, ResourceQueryParams, ResourceResponseDto, UpdateResourceDto,
};
use crate::features::resources::services::ResourceService;
use crate::shared::types::{ApiResponse, Meta};

/// List published resources (paginated)
#[utoipa::path(
    get,
    path = "/api/resources",
    params(ResourceQueryParams),
    responses(
        (status = 200, description = "Published resources", body = ApiResponse<Vec<ResourceResponseDto>>),
    ),
    tag = "resources"
)]
pub async fn list_resources(
    State(service): State<Arc<ResourceService>>,
    Query(params): Query<ResourceQueryParams>,
) -> Result<Json<ApiResponse<Vec<ResourceResponseDto>>>> {
    let (items, total) = service.list(&params, true).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get a published resource by slug (counts a view)
#[utoipa::path(
    get,
    path = "/api/resources/{slug}",
    params(
        ("slug" = String, Path, description = "Resource slug")
    ),
    responses(
        (status = 200, description = "Resource found", body = ApiResponse<ResourceResponseDto>),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn get_resource(
    State(service): State<Arc<ResourceService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ResourceResponseDto>>> {
    let resource = service.get_published_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(resource), None, None)))
}

/// List resources in any status (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/resources",
    params(ResourceQueryParams),
    responses(
        (status = 200, description = "Resources", body = ApiResponse<Vec<ResourceResponseDto>>),
    ),
    tag = "resources"
)]
pub async fn admin_list_resources(
    State(service): State<Arc<ResourceService>>,
    Query(params): Query<ResourceQueryParams>,
) -> Result<Json<ApiResponse<Vec<ResourceResponseDto>>>> {
    let (items, total) = service.list(&params, false).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get a resource by ID
#[utoipa::path(
    get,
    path = "/api/admin/resources/{id}",
    params(
        ("id" = Uuid, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource found", body = ApiResponse<ResourceResponseDto>),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn admin_get_resource(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ResourceResponseDto>>> {
    let resource = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(resource), None, None)))
}

/// Create a resource
#[utoipa::path(
    post,
    path = "/api/admin/resources",
    request_body = CreateResourceDto,
    responses(
        (status = 201, description = "Resource created", body = ApiResponse<ResourceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "resources"
)]
pub async fn create_resource(
    State(service): State<Arc<ResourceService>>,
    ValidatedJson(dto): ValidatedJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<ApiResponse<ResourceResponseDto>>)> {
    let resource = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(resource), None, None)),
    ))
}

/// Update a resource
#[utoipa::path(
    put,
    path = "/api/admin/resources/{id}",
    params(
        ("id" = Uuid, Path, description = "Resource ID")
    ),
    request_body = UpdateResourceDto,
    responses(
        (status = 200, description = "Resource updated", body = ApiResponse<ResourceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Resource not found"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "resources"
)]
pub async fn update_resource(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateResourceDto>,
) -> Result<Json<ApiResponse<ResourceResponseDto>>> {
    let resource = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(resource), None, None)))
}

/// Delete a resource (soft delete)
#[utoipa::path(
    delete,
    path = "/api/admin/resources/{id}",
    params(
        ("id" = Uuid, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource deleted"),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn delete_resource(
    State(service): State<Arc<ResourceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
