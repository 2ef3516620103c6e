/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Public URL prefix for resource category pages (breadcrumb links)
pub const RESOURCE_CATEGORY_URL_PREFIX: &str = "/resources/category";

/// Public URL prefix for resource detail pages
pub const RESOURCE_URL_PREFIX: &str = "/resources";

/// Maximum slug length stored in the database
pub const MAX_SLUG_LENGTH: usize = 255;
