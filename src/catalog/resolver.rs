//! Breadth-first expansion of a category into its whole subtree.

use super::CatalogError;
use crate::clients::CategoryClient;
use crate::model::CategoryId;
use actor_framework::ActorClient;
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// Resolves a category to itself plus all of its descendants.
///
/// The walk keeps a visited set, so a category is reported once even when the
/// stored parent links form a loop. Depth is unbounded unless a cap is set
/// with [`with_max_depth`](Self::with_max_depth).
#[derive(Clone)]
pub struct CategoryTreeResolver {
    categories: CategoryClient,
    max_depth: Option<usize>,
}

impl CategoryTreeResolver {
    pub fn new(categories: CategoryClient) -> Self {
        Self {
            categories,
            max_depth: None,
        }
    }

    /// A subtree going more than `max_depth` levels below its root yields
    /// [`CatalogError::DepthExceeded`]. `None` removes the cap.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// `root` and every category below it. Fails with `NotFound` if `root`
    /// does not exist.
    #[instrument(skip(self), fields(max_depth = ?self.max_depth))]
    pub async fn resolve_descendants(
        &self,
        root: CategoryId,
    ) -> Result<BTreeSet<CategoryId>, CatalogError> {
        self.categories.require(root).await?;
        self.descendants_of(root).await
    }

    /// Same as [`resolve_descendants`](Self::resolve_descendants) for a root
    /// the caller has already looked up.
    pub(crate) async fn descendants_of(
        &self,
        root: CategoryId,
    ) -> Result<BTreeSet<CategoryId>, CatalogError> {
        let mut visited = BTreeSet::from([root]);
        let mut frontier = vec![root];
        let mut depth = 0;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for parent in frontier {
                for child in self.categories.children_of(parent).await? {
                    if visited.insert(child.id) {
                        next.push(child.id);
                    } else {
                        warn!(%root, category = %child.id, "Category revisited, skipping loop");
                    }
                }
            }
            if !next.is_empty() {
                depth += 1;
                if let Some(max_depth) = self.max_depth.filter(|max| depth > *max) {
                    return Err(CatalogError::DepthExceeded { root, max_depth });
                }
            }
            frontier = next;
        }

        debug!(%root, size = visited.len(), depth, "Resolved subtree");
        Ok(visited)
    }
}
