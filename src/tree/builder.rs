use super::{FpTree, HeaderTable};
use crate::item::ItemId;
use ahash::AHashMap;

/// Builds an [`FpTree`] from weighted item paths.
///
/// Plain transactions are paths of weight 1; conditional pattern bases carry
/// the count of the node they were collected from.
pub(crate) struct TreeBuilder {
    min_support: u64,
}

impl TreeBuilder {
    pub(crate) fn new(min_support: u64) -> Self {
        Self { min_support }
    }

    pub(crate) fn build<P>(&self, paths: &[(P, u64)]) -> FpTree
    where
        P: AsRef<[ItemId]>,
    {
        // Pass 1: global counts, then prune and order.
        let mut counts: AHashMap<ItemId, u64> = AHashMap::new();
        for (path, weight) in paths {
            for item in path.as_ref() {
                *counts.entry(*item).or_insert(0) += *weight;
            }
        }
        let header = HeaderTable::from_counts(counts, self.min_support);
        let mut tree = FpTree::with_header(header);
        if tree.header().is_empty() {
            return tree;
        }

        // Pass 2: insert every path re-sorted by the global order.
        let mut ordered: Vec<ItemId> = Vec::new();
        for (path, weight) in paths {
            ordered.clear();
            ordered.extend(
                path.as_ref()
                    .iter()
                    .copied()
                    .filter(|item| tree.header().contains(*item)),
            );
            ordered.sort_by_key(|item| tree.header().rank(*item).unwrap_or(usize::MAX));
            ordered.dedup();
            if !ordered.is_empty() {
                tree.insert(&ordered, *weight);
            }
        }
        tree
    }
}
