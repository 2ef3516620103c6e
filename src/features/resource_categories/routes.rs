use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::resource_categories::handlers;
use crate::features::resource_categories::services::CategoryService;

/// Public read routes for the resource category tree
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/resource-categories", get(handlers::list_categories))
        .route("/api/resource-categories/{slug}", get(handlers::get_category))
        .route(
            "/api/resource-categories/{slug}/breadcrumb",
            get(handlers::get_breadcrumb),
        )
        .with_state(service)
}

/// Admin routes, mounted under `/api/admin`
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/resource-categories",
            get(handlers::admin_list_categories).post(handlers::create_category),
        )
        .route(
            "/resource-categories/{id}",
            get(handlers::admin_get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/resource-categories/{id}/recount",
            post(handlers::recount_category),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::resource_categories::store::memory::InMemoryCategoryStore;

    fn server() -> TestServer {
        let service = Arc::new(CategoryService::new(Arc::new(InMemoryCategoryStore::new())));
        let app = Router::new()
            .merge(routes(Arc::clone(&service)))
            .nest("/api/admin", admin_routes(service));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_browse_tree() {
        let server = server();

        let created = server
            .post("/api/admin/resource-categories")
            .json(&json!({ "name": "Web Development" }))
            .await;
        created.assert_status(axum::http::StatusCode::CREATED);
        let parent: Value = created.json();
        let parent_id = parent["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(parent["data"]["slug"], "web-development");

        server
            .post("/api/admin/resource-categories")
            .json(&json!({ "name": "Rust", "parent_id": parent_id }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let tree: Value = server
            .get("/api/resource-categories")
            .add_query_param("tree", "true")
            .await
            .json();
        assert_eq!(tree["data"][0]["children"][0]["slug"], "rust");

        let crumbs: Value = server
            .get("/api/resource-categories/rust/breadcrumb")
            .await
            .json();
        assert_eq!(crumbs["data"][0]["url"], "/resources/category/web-development");
        assert_eq!(crumbs["data"][1]["name"], "Rust");
    }

    #[tokio::test]
    async fn test_validation_failure_lists_fields() {
        let server = server();
        let response = server
            .post("/api/admin/resource-categories")
            .json(&json!({ "name": "", "color": "red" }))
            .await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("name:")));
        assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("color:")));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_404() {
        let server = server();
        server
            .get("/api/resource-categories/missing")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_delete_then_recount_missing_category() {
        let server = server();
        let created: Value = server
            .post("/api/admin/resource-categories")
            .json(&json!({ "name": "Temporary" }))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        server
            .delete(&format!("/api/admin/resource-categories/{}", id))
            .await
            .assert_status_ok();
        server
            .post(&format!("/api/admin/resource-categories/{}/recount", id))
            .await
            .assert_status_not_found();
    }
}
