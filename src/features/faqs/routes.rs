use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::faqs::handlers;
use crate::features::faqs::services::FaqService;

/// Public FAQ page
pub fn routes(service: Arc<FaqService>) -> Router {
    Router::new()
        .route("/api/faqs", get(handlers::list_public_faqs))
        .with_state(service)
}

/// Admin routes, mounted under `/api/admin`
pub fn admin_routes(service: Arc<FaqService>) -> Router {
    Router::new()
        .route(
            "/faq-categories",
            get(handlers::list_faq_categories).post(handlers::create_faq_category),
        )
        .route(
            "/faq-categories/{id}",
            get(handlers::get_faq_category)
                .put(handlers::update_faq_category)
                .delete(handlers::delete_faq_category),
        )
        .route("/faqs", get(handlers::list_faqs).post(handlers::create_faq))
        .route(
            "/faqs/{id}",
            get(handlers::get_faq)
                .put(handlers::update_faq)
                .delete(handlers::delete_faq),
        )
        .with_state(service)
}
