//! Resource-count aggregation.
//!
//! `resource_count(n) = published resources attached to n + Σ resource_count(c)`
//! over the active direct children `c` of `n`. [`recount`] rebuilds the
//! subtree under a node bottom-up and then refreshes every ancestor up to the
//! root, so the whole chain is consistent again after any change at `n`.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::resource_categories::store::CategorySession;

/// Recompute the count of `category_id` and everything above it. Returns the node's count.
pub async fn recount(session: &mut dyn CategorySession, category_id: Uuid) -> Result<i64> {
    let total = recount_subtree(session, category_id).await?;
    propagate_upward(session, category_id).await?;
    Ok(total)
}

/// Post-order walk over active descendants, writing each node's count.
async fn recount_subtree(session: &mut dyn CategorySession, root_id: Uuid) -> Result<i64> {
    let mut totals: HashMap<Uuid, i64> = HashMap::new();
    let mut child_ids: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut seen = HashSet::new();
    let mut stack = vec![(root_id, false)];

    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            let own = session.count_published_resources(id).await?;
            let from_children: i64 = child_ids
                .get(&id)
                .map(|ids| ids.iter().filter_map(|c| totals.get(c)).sum::<i64>())
                .unwrap_or(0);
            let total = own + from_children;
            session.set_resource_count(id, total).await?;
            totals.insert(id, total);
            continue;
        }

        if !seen.insert(id) {
            continue;
        }

        let children: Vec<Uuid> = session
            .children_of(id)
            .await?
            .into_iter()
            .filter(|c| c.is_active)
            .map(|c| c.id)
            .collect();

        stack.push((id, true));
        stack.extend(children.iter().map(|c| (*c, false)));
        child_ids.insert(id, children);
    }

    totals
        .get(&root_id)
        .copied()
        .ok_or_else(|| AppError::Internal(format!("Recount skipped category {}", root_id)))
}

/// Refresh each ancestor from its own resources plus its children's stored counts.
async fn propagate_upward(session: &mut dyn CategorySession, category_id: Uuid) -> Result<()> {
    let mut seen = HashSet::from([category_id]);
    let mut next = session
        .find(category_id)
        .await?
        .and_then(|c| c.parent_id);

    while let Some(parent_id) = next {
        if !seen.insert(parent_id) {
            return Err(AppError::Internal(format!(
                "Category hierarchy contains a cycle through {}",
                parent_id
            )));
        }

        let own = session.count_published_resources(parent_id).await?;
        let from_children: i64 = session
            .children_of(parent_id)
            .await?
            .iter()
            .filter(|c| c.is_active)
            .map(|c| c.resource_count)
            .sum();
        session.set_resource_count(parent_id, own + from_children).await?;

        next = session.find(parent_id).await?.and_then(|c| c.parent_id);
    }

    Ok(())
}
