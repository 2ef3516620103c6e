use utoipa::{Modify, OpenApi};

use crate::features::faqs::{dtos as faqs_dtos, handlers as faqs_handlers};
use crate::features::inquiries::{
    dtos as inquiries_dtos, handlers as inquiries_handlers, models as inquiries_models,
};
use crate::features::resource_categories::{
    dtos as categories_dtos, handlers as categories_handlers,
};
use crate::features::resources::{
    dtos as resources_dtos, handlers as resources_handlers, models as resources_models,
    services::seo,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Resource categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::get_breadcrumb,
        // Resource categories (admin)
        categories_handlers::admin_list_categories,
        categories_handlers::admin_get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        categories_handlers::recount_category,
        // Resources (public)
        resources_handlers::list_resources,
        resources_handlers::get_resource,
        // Resources (admin)
        resources_handlers::admin_list_resources,
        resources_handlers::admin_get_resource,
        resources_handlers::create_resource,
        resources_handlers::update_resource,
        resources_handlers::delete_resource,
        // FAQs (public)
        faqs_handlers::list_public_faqs,
        // FAQs (admin)
        faqs_handlers::list_faq_categories,
        faqs_handlers::get_faq_category,
        faqs_handlers::create_faq_category,
        faqs_handlers::update_faq_category,
        faqs_handlers::delete_faq_category,
        faqs_handlers::list_faqs,
        faqs_handlers::get_faq,
        faqs_handlers::create_faq,
        faqs_handlers::update_faq,
        faqs_handlers::delete_faq,
        // Inquiries
        inquiries_handlers::submit_inquiry,
        inquiries_handlers::list_inquiries,
        inquiries_handlers::get_inquiry,
        inquiries_handlers::update_inquiry_status,
        inquiries_handlers::delete_inquiry,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Resource categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryDetailDto,
            categories_dtos::BreadcrumbItemDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryDetailDto>,
            ApiResponse<Vec<categories_dtos::BreadcrumbItemDto>>,
            // Resources
            resources_models::ResourceStatus,
            resources_models::GalleryItem,
            seo::SeoGrade,
            resources_dtos::CreateResourceDto,
            resources_dtos::UpdateResourceDto,
            resources_dtos::ResourceResponseDto,
            ApiResponse<resources_dtos::ResourceResponseDto>,
            ApiResponse<Vec<resources_dtos::ResourceResponseDto>>,
            // FAQs
            faqs_dtos::CreateFaqCategoryDto,
            faqs_dtos::UpdateFaqCategoryDto,
            faqs_dtos::FaqCategoryResponseDto,
            faqs_dtos::CreateFaqDto,
            faqs_dtos::UpdateFaqDto,
            faqs_dtos::FaqResponseDto,
            faqs_dtos::FaqGroupDto,
            ApiResponse<Vec<faqs_dtos::FaqGroupDto>>,
            ApiResponse<faqs_dtos::FaqCategoryResponseDto>,
            ApiResponse<faqs_dtos::FaqResponseDto>,
            // Inquiries
            inquiries_models::InquiryStatus,
            inquiries_dtos::CreateInquiryDto,
            inquiries_dtos::UpdateInquiryStatusDto,
            inquiries_dtos::InquiryResponseDto,
            ApiResponse<inquiries_dtos::InquiryResponseDto>,
            ApiResponse<Vec<inquiries_dtos::InquiryResponseDto>>,
        )
    ),
    tags(
        (name = "resource-categories", description = "Hierarchical resource categories"),
        (name = "resources", description = "Articles with SEO scoring and galleries"),
        (name = "faqs", description = "FAQ knowledge base"),
        (name = "inquiries", description = "Contact form submissions")
    )
)]
pub struct ApiDoc;

/// Overrides the OpenAPI info block with values from configuration
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_public_and_admin_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/resource-categories/{slug}/breadcrumb"));
        assert!(paths.contains_key("/api/admin/resource-categories/{id}/recount"));
        assert!(paths.contains_key("/api/resources/{slug}"));
        assert!(paths.contains_key("/api/faqs"));
        assert!(paths.contains_key("/api/admin/inquiries/{id}/status"));
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Site CMS".to_string(),
            version: "9.9.9".to_string(),
            description: "content backend".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Site CMS");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("content backend"));
    }
}
