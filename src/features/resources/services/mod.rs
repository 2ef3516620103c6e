pub mod resource_service;
pub mod seo;

pub use resource_service::ResourceService;
