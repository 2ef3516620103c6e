//! Read-only views over the stored parent/child edges.
//!
//! Walks follow `parent_id` pointers or ask the session for the children of
//! one node at a time; nothing is cached between calls.

use std::collections::HashSet;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::resource_categories::dtos::BreadcrumbItemDto;
use crate::features::resource_categories::models::ResourceCategory;
use crate::features::resource_categories::store::CategorySession;

/// Ancestors from the root-most down to the immediate parent. Empty for roots.
pub async fn ancestors_of(
    session: &mut dyn CategorySession,
    category: &ResourceCategory,
) -> Result<Vec<ResourceCategory>> {
    let mut chain = Vec::new();
    let mut seen = HashSet::from([category.id]);
    let mut next = category.parent_id;

    while let Some(parent_id) = next {
        if !seen.insert(parent_id) {
            return Err(AppError::Internal(format!(
                "Category hierarchy contains a cycle through {}",
                parent_id
            )));
        }

        let Some(parent) = session.find(parent_id).await? else {
            tracing::warn!(
                "Category {} points at missing parent {}",
                category.id,
                parent_id
            );
            break;
        };
        next = parent.parent_id;
        chain.push(parent);
    }

    chain.reverse();
    Ok(chain)
}

/// Every category below `category`, in pre-order (children by sort order, then name).
pub async fn descendants_of(
    session: &mut dyn CategorySession,
    category: &ResourceCategory,
) -> Result<Vec<ResourceCategory>> {
    let mut descendants = Vec::new();
    let mut seen = HashSet::from([category.id]);

    let mut stack: Vec<ResourceCategory> = session.children_of(category.id).await?;
    stack.reverse();

    while let Some(node) = stack.pop() {
        if !seen.insert(node.id) {
            continue;
        }
        let mut children = session.children_of(node.id).await?;
        children.reverse();
        descendants.push(node);
        stack.extend(children);
    }

    Ok(descendants)
}

/// Ids of `root` and everything below it, in pre-order.
///
/// With `active_only`, an inactive root yields nothing and inactive nodes
/// hide their whole subtree, active descendants included.
pub async fn subtree_ids(
    session: &mut dyn CategorySession,
    root: &ResourceCategory,
    active_only: bool,
) -> Result<Vec<Uuid>> {
    if active_only && !root.is_active {
        return Ok(Vec::new());
    }

    let mut ids = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![root.id];

    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        ids.push(id);
        let children = session.children_of(id).await?;
        stack.extend(
            children
                .into_iter()
                .rev()
                .filter(|c| !active_only || c.is_active)
                .map(|c| c.id),
        );
    }

    Ok(ids)
}

/// Depth of the node; roots are level 0.
pub async fn hierarchy_level(
    session: &mut dyn CategorySession,
    category: &ResourceCategory,
) -> Result<usize> {
    Ok(ancestors_of(session, category).await?.len())
}

/// Ancestors plus the node itself, reduced to link data.
pub async fn breadcrumb(
    session: &mut dyn CategorySession,
    category: &ResourceCategory,
) -> Result<Vec<BreadcrumbItemDto>> {
    let mut trail: Vec<BreadcrumbItemDto> = ancestors_of(session, category)
        .await?
        .iter()
        .map(BreadcrumbItemDto::from)
        .collect();
    trail.push(BreadcrumbItemDto::from(category));
    Ok(trail)
}

/// True if `ancestor_id` lies on the parent chain of `category`.
pub async fn is_ancestor_of(
    session: &mut dyn CategorySession,
    ancestor_id: Uuid,
    category: &ResourceCategory,
) -> Result<bool> {
    Ok(ancestors_of(session, category)
        .await?
        .iter()
        .any(|a| a.id == ancestor_id))
}

/// True if `category` sits somewhere below `ancestor_id`. A node is not its own descendant.
pub async fn is_descendant_of(
    session: &mut dyn CategorySession,
    category: &ResourceCategory,
    ancestor_id: Uuid,
) -> Result<bool> {
    is_ancestor_of(session, ancestor_id, category).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::resource_categories::models::ResourceCategoryChanges;
    use crate::features::resource_categories::store::memory::InMemoryCategoryStore;
    use crate::features::resource_categories::store::CategoryStore;

    #[tokio::test]
    async fn test_chain_levels_and_descendants() {
        let store = InMemoryCategoryStore::new();
        let a = store.seed("A", None).await;
        let b = store.seed("B", Some(a.id)).await;
        let c = store.seed("C", Some(b.id)).await;
        let mut session = store.begin().await.unwrap();

        assert_eq!(hierarchy_level(session.as_mut(), &a).await.unwrap(), 0);
        assert_eq!(hierarchy_level(session.as_mut(), &c).await.unwrap(), 2);

        let ancestors = ancestors_of(session.as_mut(), &c).await.unwrap();
        assert_eq!(
            ancestors.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );

        let below_a = descendants_of(session.as_mut(), &a).await.unwrap();
        assert_eq!(
            below_a.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![b.id, c.id]
        );
        assert!(descendants_of(session.as_mut(), &c).await.unwrap().is_empty());

        assert!(is_ancestor_of(session.as_mut(), a.id, &c).await.unwrap());
        assert!(is_descendant_of(session.as_mut(), &c, b.id).await.unwrap());
        assert!(!is_descendant_of(session.as_mut(), &a, c.id).await.unwrap());
        assert!(!is_ancestor_of(session.as_mut(), c.id, &c).await.unwrap());
    }

    #[tokio::test]
    async fn test_breadcrumb_ends_with_self() {
        let store = InMemoryCategoryStore::new();
        let guides = store.seed("Guides", None).await;
        let seo = store.seed("SEO Basics", Some(guides.id)).await;
        let mut session = store.begin().await.unwrap();

        let trail = breadcrumb(session.as_mut(), &seo).await.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].url, "/resources/category/guides");
        assert_eq!(trail[1].slug, "seo-basics");

        let root_trail = breadcrumb(session.as_mut(), &guides).await.unwrap();
        assert_eq!(root_trail.len(), 1);
    }

    #[tokio::test]
    async fn test_active_subtree_prunes_hidden_branches() {
        let store = InMemoryCategoryStore::new();
        let guides = store.seed("Guides", None).await;
        let seo = store.seed("SEO", Some(guides.id)).await;
        let drafts = store.seed("Drafts", Some(guides.id)).await;
        let nested = store.seed("Nested", Some(drafts.id)).await;
        let mut session = store.begin().await.unwrap();
        session
            .update(
                drafts.id,
                ResourceCategoryChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let every = subtree_ids(session.as_mut(), &guides, false).await.unwrap();
        assert_eq!(every, vec![guides.id, seo.id, drafts.id, nested.id]);

        let visible = subtree_ids(session.as_mut(), &guides, true).await.unwrap();
        assert_eq!(visible, vec![guides.id, seo.id]);

        let hidden = session.find(drafts.id).await.unwrap().unwrap();
        assert!(subtree_ids(session.as_mut(), &hidden, true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupted_loop_is_reported() {
        let store = InMemoryCategoryStore::new();
        let a = store.seed("A", None).await;
        let b = store.seed("B", Some(a.id)).await;
        store.force_parent(a.id, Some(b.id)).await;

        let mut session = store.begin().await.unwrap();
        let b = session.find(b.id).await.unwrap().unwrap();
        assert!(matches!(
            ancestors_of(session.as_mut(), &b).await,
            Err(AppError::Internal(_))
        ));

        // Descendant walks terminate on the same data
        let below = descendants_of(session.as_mut(), &b).await.unwrap();
        assert_eq!(below.len(), 1);
    }
}
