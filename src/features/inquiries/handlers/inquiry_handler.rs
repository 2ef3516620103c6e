use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::inquiries::dtos::{
    CreateInquiryDto, InquiryQueryParams, InquiryResponseDto, UpdateInquiryStatusDto,
};
use crate::features::inquiries::services::InquiryService;
use crate::shared::types::{ApiResponse, Meta};

/// Submit the contact form
#[utoipa::path(
    post,
    path = "/api/inquiries",
    request_body = CreateInquiryDto,
    responses(
        (status = 201, description = "Inquiry received", body = ApiResponse<InquiryResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "inquiries"
)]
pub async fn submit_inquiry(
    State(service): State<Arc<InquiryService>>,
    ValidatedJson(dto): ValidatedJson<CreateInquiryDto>,
) -> Result<(StatusCode, Json<ApiResponse<InquiryResponseDto>>)> {
    let inquiry = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(inquiry),
            Some("Thank you, we will be in touch shortly".to_string()),
            None,
        )),
    ))
}

/// List inquiries (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/admin/inquiries",
    params(InquiryQueryParams),
    responses(
        (status = 200, description = "Inquiries", body = ApiResponse<Vec<InquiryResponseDto>>),
    ),
    tag = "inquiries"
)]
pub async fn list_inquiries(
    State(service): State<Arc<InquiryService>>,
    Query(params): Query<InquiryQueryParams>,
) -> Result<Json<ApiResponse<Vec<InquiryResponseDto>>>> {
    let (items, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/inquiries/{id}",
    params(
        ("id" = Uuid, Path, description = "Inquiry ID")
    ),
    responses(
        (status = 200, description = "Inquiry found", body = ApiResponse<InquiryResponseDto>),
        (status = 404, description = "Inquiry not found")
    ),
    tag = "inquiries"
)]
pub async fn get_inquiry(
    State(service): State<Arc<InquiryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InquiryResponseDto>>> {
    let inquiry = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(inquiry), None, None)))
}

/// Change the triage status of an inquiry
#[utoipa::path(
    put,
    path = "/api/admin/inquiries/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Inquiry ID")
    ),
    request_body = UpdateInquiryStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<InquiryResponseDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Inquiry not found")
    ),
    tag = "inquiries"
)]
pub async fn update_inquiry_status(
    State(service): State<Arc<InquiryService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateInquiryStatusDto>,
) -> Result<Json<ApiResponse<InquiryResponseDto>>> {
    let inquiry = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(inquiry), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/inquiries/{id}",
    params(
        ("id" = Uuid, Path, description = "Inquiry ID")
    ),
    responses(
        (status = 200, description = "Inquiry deleted"),
        (status = 404, description = "Inquiry not found")
    ),
    tag = "inquiries"
)]
pub async fn delete_inquiry(
    State(service): State<Arc<InquiryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
