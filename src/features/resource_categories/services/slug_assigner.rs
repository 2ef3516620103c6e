use uuid::Uuid;

use crate::core::error::Result;
use crate::features::resource_categories::store::CategorySession;
use crate::shared::slug::{require_base_slug, resolve_collisions};

/// Assign a unique category slug.
///
/// The explicit slug wins when it normalizes to something non-empty,
/// otherwise the slug is derived from `fallback` (the category name). A
/// single collision count decides the suffix; `current_id` is excluded so
/// a category keeps its own slug on update.
pub async fn assign_slug(
    session: &mut dyn CategorySession,
    explicit: Option<&str>,
    fallback: &str,
    current_id: Option<Uuid>,
) -> Result<String> {
    let base = require_base_slug(explicit, fallback)?;
    let collisions = session.slug_collisions(&base, current_id).await?;
    Ok(resolve_collisions(&base, collisions))
}
