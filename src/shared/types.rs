use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::DEFAULT_PAGE_SIZE;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Serde default for `page` on paginated query params.
pub fn default_page() -> i64 {
    1
}

/// Serde default for `page_size` on paginated query params.
pub fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

// =============================================================================
// PATCH SEMANTICS
// =============================================================================

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>`: a missing key stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
