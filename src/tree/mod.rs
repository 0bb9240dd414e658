//! The FP-tree: a prefix tree of transactions ordered by descending item frequency.
//!
//! Nodes live in an arena and refer to each other by index. Each node owns its
//! children through the arena, and the header table keeps the same-item chains
//! as lists of node indices, so no node ever needs a second owner.

use crate::item::ItemId;
use crate::transaction::Transaction;
use ahash::AHashMap;
use tracing::debug;

mod builder;
mod header;

pub(crate) use builder::TreeBuilder;
pub use header::{HeaderEntry, HeaderTable};

/// Index of a node in an [`FpTree`]'s arena.
pub type NodeId = usize;

/// The sentinel root is always the first node of the arena.
pub const ROOT: NodeId = 0;

/// A single tree node. The root is the only node without an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpNode {
    item: Option<ItemId>,
    count: u64,
    parent: Option<NodeId>,
    children: AHashMap<ItemId, NodeId>,
}

impl FpNode {
    fn root() -> Self {
        Self {
            item: None,
            count: 0,
            parent: None,
            children: AHashMap::new(),
        }
    }

    pub fn item(&self) -> Option<ItemId> {
        self.item
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child(&self, item: ItemId) -> Option<NodeId> {
        self.children.get(&item).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = (ItemId, NodeId)> + '_ {
        self.children.iter().map(|(item, node)| (*item, *node))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_root(&self) -> bool {
        self.item.is_none()
    }
}

/// A compressed prefix tree plus the header table describing its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpTree {
    nodes: Vec<FpNode>,
    header: HeaderTable,
}

impl FpTree {
    /// Builds the tree for a set of transactions.
    ///
    /// Items occurring in fewer than `min_support` transactions are dropped up
    /// front: no itemset containing them can be frequent.
    pub fn build(transactions: &[Transaction], min_support: u64) -> Self {
        let paths: Vec<(&[ItemId], u64)> = transactions.iter().map(|t| (t.items(), 1)).collect();
        let tree = TreeBuilder::new(min_support).build(&paths);
        debug!(
            transactions = transactions.len(),
            frequent_items = tree.header.len(),
            nodes = tree.node_count(),
            "built prefix tree"
        );
        tree
    }

    pub(crate) fn with_header(header: HeaderTable) -> Self {
        Self {
            nodes: vec![FpNode::root()],
            header,
        }
    }

    /// Walks `path` down from the root, sharing existing edges and creating
    /// new nodes (and chain links) where the path diverges.
    pub(crate) fn insert(&mut self, path: &[ItemId], weight: u64) {
        let mut current = ROOT;
        for &item in path {
            current = match self.nodes[current].child(item) {
                Some(child) => {
                    self.nodes[child].count += weight;
                    child
                }
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(FpNode {
                        item: Some(item),
                        count: weight,
                        parent: Some(current),
                        children: AHashMap::new(),
                    });
                    self.nodes[current].children.insert(item, id);
                    self.header.link(item, id);
                    id
                }
            };
        }
    }

    pub fn root(&self) -> &FpNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> Option<&FpNode> {
        self.nodes.get(id)
    }

    pub fn header(&self) -> &HeaderTable {
        &self.header
    }

    /// Number of item nodes, not counting the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// If no node has more than one child, returns the path's node ids from
    /// the top down. An empty tree is a (trivially empty) single path.
    pub fn single_path(&self) -> Option<Vec<NodeId>> {
        let mut path = Vec::new();
        let mut current = self.root();
        loop {
            match current.child_count() {
                0 => return Some(path),
                1 => {
                    let (_, next) = current.children().next()?;
                    path.push(next);
                    current = &self.nodes[next];
                }
                _ => return None,
            }
        }
    }

    /// Items from the root down to `node`'s parent, excluding `node` itself.
    pub fn prefix_path(&self, node: NodeId) -> Vec<ItemId> {
        let mut items = Vec::new();
        let mut cursor = self.nodes.get(node).and_then(FpNode::parent);
        while let Some(id) = cursor {
            let current = &self.nodes[id];
            match current.item {
                Some(item) => items.push(item),
                None => break,
            }
            cursor = current.parent;
        }
        items.reverse();
        items
    }

    /// The prefix paths leading to every occurrence of `item`, each weighted by
    /// that occurrence's count. Occurrences directly under the root add nothing.
    pub fn conditional_pattern_base(&self, item: ItemId) -> Vec<(Vec<ItemId>, u64)> {
        self.header
            .chain(item)
            .iter()
            .filter_map(|&node| {
                let path = self.prefix_path(node);
                (!path.is_empty()).then(|| (path, self.nodes[node].count))
            })
            .collect()
    }

    /// A freshly allocated tree built from `item`'s conditional pattern base.
    pub fn conditional_tree(&self, item: ItemId, min_support: u64) -> FpTree {
        let base = self.conditional_pattern_base(item);
        TreeBuilder::new(min_support).build(&base)
    }
}
