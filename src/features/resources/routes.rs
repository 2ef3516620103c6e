use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::resources::handlers;
use crate::features::resources::services::ResourceService;

/// Public routes: published resources only
pub fn routes(service: Arc<ResourceService>) -> Router {
    Router::new()
        .route("/api/resources", get(handlers::list_resources))
        .route("/api/resources/{slug}", get(handlers::get_resource))
        .with_state(service)
}

/// Admin routes, mounted under `/api/admin`
pub fn admin_routes(service: Arc<ResourceService>) -> Router {
    Router::new()
        .route(
            "/resources",
            get(handlers::admin_list_resources).post(handlers::create_resource),
        )
        .route(
            "/resources/{id}",
            get(handlers::admin_get_resource)
                .put(handlers::update_resource)
                .delete(handlers::delete_resource),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::resource_categories::dtos::CreateCategoryDto;
    use crate::features::resource_categories::store::memory::InMemoryCategoryStore;
    use crate::features::resource_categories::CategoryService;
    use crate::features::resources::store::memory::InMemoryResourceStore;

    fn server() -> (TestServer, CategoryService) {
        let store = InMemoryCategoryStore::new();
        let categories = CategoryService::new(Arc::new(store.clone()));
        let service = Arc::new(ResourceService::new(Arc::new(InMemoryResourceStore::new(
            store,
        ))));
        let app = Router::new()
            .merge(routes(Arc::clone(&service)))
            .nest("/api/admin", admin_routes(service));
        (TestServer::new(app).unwrap(), categories)
    }

    #[tokio::test]
    async fn test_publish_then_read_publicly() {
        let (server, categories) = server();
        let guides = categories
            .create_category(CreateCategoryDto {
                name: "Guides".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let created = server
            .post("/api/admin/resources")
            .json(&json!({
                "title": "Choosing a CMS",
                "category_id": guides.id,
                "status": "published",
                "gallery": [{ "url": "https://cdn.example.com/cms.png", "alt_text": "Dashboard" }]
            }))
            .await;
        created.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = created.json();
        assert_eq!(body["data"]["slug"], "choosing-a-cms");
        assert_eq!(body["data"]["url"], "/resources/choosing-a-cms");
        assert!(body["data"]["seo_score"].as_i64().unwrap() > 0);

        let read: Value = server.get("/api/resources/choosing-a-cms").await.json();
        assert_eq!(read["data"]["view_count"], 1);

        let listed: Value = server
            .get("/api/resources")
            .add_query_param("category_id", guides.id)
            .add_query_param("include_subcategories", "true")
            .await
            .json();
        assert_eq!(listed["meta"]["total"], 1);
        assert_eq!(categories.get_by_id(guides.id).await.unwrap().resource_count, 1);
    }

    #[tokio::test]
    async fn test_drafts_stay_private() {
        let (server, _) = server();
        let created: Value = server
            .post("/api/admin/resources")
            .json(&json!({ "title": "Work in progress" }))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        server
            .get("/api/resources/work-in-progress")
            .await
            .assert_status_not_found();
        server
            .get(&format!("/api/admin/resources/{}", id))
            .await
            .assert_status_ok();

        let public: Value = server.get("/api/resources").await.json();
        assert_eq!(public["meta"]["total"], 0);
        let admin: Value = server
            .get("/api/admin/resources")
            .add_query_param("status", "draft")
            .await
            .json();
        assert_eq!(admin["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let (server, _) = server();
        let response = server
            .post("/api/admin/resources")
            .json(&json!({ "title": "Lost", "category_id": uuid::Uuid::new_v4() }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        let errors = body["errors"].as_array().unwrap();
        assert!(errors
            .iter()
            .any(|e| e.as_str().unwrap().starts_with("category_id:")));
    }
}
