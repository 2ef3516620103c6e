use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::inquiries::handlers;
use crate::features::inquiries::services::InquiryService;

/// Public contact form endpoint
pub fn routes(service: Arc<InquiryService>) -> Router {
    Router::new()
        .route("/api/inquiries", post(handlers::submit_inquiry))
        .with_state(service)
}

/// Admin routes, mounted under `/api/admin`
pub fn admin_routes(service: Arc<InquiryService>) -> Router {
    Router::new()
        .route("/inquiries", get(handlers::list_inquiries))
        .route(
            "/inquiries/{id}",
            get(handlers::get_inquiry).delete(handlers::delete_inquiry),
        )
        .route(
            "/inquiries/{id}/status",
            put(handlers::update_inquiry_status),
        )
        .with_state(service)
}
