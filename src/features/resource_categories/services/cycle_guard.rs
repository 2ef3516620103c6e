use std::collections::HashSet;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::resource_categories::store::CategorySession;

/// Would making `proposed_parent_id` the parent of `node_id` close a loop?
///
/// True when the proposed parent is the node itself or anywhere below it,
/// i.e. when `node_id` appears on the proposed parent's ancestor chain. An
/// already-corrupted chain (a loop not passing through `node_id`) is also
/// reported as a cycle.
pub async fn would_create_cycle(
    session: &mut dyn CategorySession,
    node_id: Uuid,
    proposed_parent_id: Uuid,
) -> Result<bool> {
    if proposed_parent_id == node_id {
        return Ok(true);
    }

    let mut seen = HashSet::new();
    let mut cursor = Some(proposed_parent_id);

    while let Some(current) = cursor {
        if current == node_id {
            return Ok(true);
        }
        if !seen.insert(current) {
            tracing::warn!("Existing category cycle detected at {}", current);
            return Ok(true);
        }
        cursor = session.find(current).await?.and_then(|c| c.parent_id);
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::resource_categories::store::memory::InMemoryCategoryStore;
    use crate::features::resource_categories::store::CategoryStore;

    #[tokio::test]
    async fn test_cycle_detection_on_chain() {
        let store = InMemoryCategoryStore::new();
        let a = store.seed("A", None).await;
        let b = store.seed("B", Some(a.id)).await;
        let c = store.seed("C", Some(b.id)).await;
        let other = store.seed("Other", None).await;
        let mut session = store.begin().await.unwrap();

        assert!(would_create_cycle(session.as_mut(), a.id, c.id).await.unwrap());
        assert!(would_create_cycle(session.as_mut(), a.id, a.id).await.unwrap());
        assert!(would_create_cycle(session.as_mut(), b.id, c.id).await.unwrap());
        assert!(!would_create_cycle(session.as_mut(), c.id, a.id).await.unwrap());
        assert!(!would_create_cycle(session.as_mut(), a.id, other.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_existing_loop_counts_as_cycle() {
        let store = InMemoryCategoryStore::new();
        let x = store.seed("X", None).await;
        let y = store.seed("Y", Some(x.id)).await;
        store.force_parent(x.id, Some(y.id)).await;
        let outsider = store.seed("Outsider", None).await;
        let mut session = store.begin().await.unwrap();

        assert!(would_create_cycle(session.as_mut(), outsider.id, y.id)
            .await
            .unwrap());
    }
}
