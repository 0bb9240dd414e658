use super::Itemset;
use crate::item::ItemId;
use crate::tree::{FpTree, NodeId};
use itertools::Itertools;

/// One unit of FP-growth work: a tree to mine and the suffix its itemsets extend.
///
/// A frame exclusively owns its tree; the tree is dropped once the frame has
/// been expanded.
pub(super) struct Frame {
    tree: FpTree,
    suffix: Vec<ItemId>,
}

impl Frame {
    pub(super) fn root(tree: FpTree) -> Self {
        Self {
            tree,
            suffix: Vec::new(),
        }
    }

    /// Emits this frame's itemsets into `out` and returns the conditional
    /// frames that still need mining.
    pub(super) fn expand(self, min_support: u64, out: &mut Vec<Itemset>) -> Vec<Frame> {
        if self.tree.header().is_empty() {
            return Vec::new();
        }

        if let Some(path) = self.tree.single_path() {
            self.emit_path_combinations(&path, out);
            return Vec::new();
        }

        let mut children = Vec::new();
        for item in self.tree.header().items_ascending() {
            let count = self.tree.header().count(item).unwrap_or(0);
            if count < min_support {
                continue;
            }

            let mut suffix = self.suffix.clone();
            suffix.push(item);
            out.push(Itemset::new(suffix.iter().copied(), count));

            let conditional = self.tree.conditional_tree(item, min_support);
            if !conditional.header().is_empty() {
                children.push(Frame {
                    tree: conditional,
                    suffix,
                });
            }
        }
        children
    }

    /// On a single path every combination of its nodes is frequent; the
    /// support of a combination is the smallest count among the chosen nodes.
    fn emit_path_combinations(&self, path: &[NodeId], out: &mut Vec<Itemset>) {
        let nodes: Vec<(ItemId, u64)> = path
            .iter()
            .filter_map(|id| self.tree.node(*id))
            .filter_map(|node| node.item().map(|item| (item, node.count())))
            .collect();

        for combination in nodes.iter().powerset().skip(1) {
            let support = combination
                .iter()
                .map(|(_, count)| *count)
                .min()
                .unwrap_or(0);
            let items = combination
                .iter()
                .map(|(item, _)| *item)
                .chain(self.suffix.iter().copied());
            out.push(Itemset::new(items, support));
        }
    }
}
