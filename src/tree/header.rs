use super::NodeId;
use crate::item::ItemId;
use ahash::AHashMap;

/// Per-item bookkeeping of an [`FpTree`](super::FpTree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    count: u64,
    rank: usize,
    nodes: Vec<NodeId>,
}

impl HeaderEntry {
    /// Total (weighted) occurrences of the item in the tree's input.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Position in the global order; 0 is the most frequent item.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The same-item chain: every tree node holding this item, in insertion order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

/// Maps each surviving item to its total count and its same-item node chain.
///
/// Chains are stored as node indices into the owning tree's arena rather than
/// as links between nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    entries: AHashMap<ItemId, HeaderEntry>,
    /// Surviving items by descending count, ties by ascending `ItemId`.
    order: Vec<ItemId>,
}

impl HeaderTable {
    /// Drops items below `min_support` and fixes the global order of the rest.
    pub(crate) fn from_counts(counts: AHashMap<ItemId, u64>, min_support: u64) -> Self {
        let mut survivors: Vec<(ItemId, u64)> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_support)
            .collect();
        survivors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let order: Vec<ItemId> = survivors.iter().map(|(item, _)| *item).collect();
        let entries = survivors
            .into_iter()
            .enumerate()
            .map(|(rank, (item, count))| {
                (
                    item,
                    HeaderEntry {
                        count,
                        rank,
                        nodes: Vec::new(),
                    },
                )
            })
            .collect();

        Self { entries, order }
    }

    pub(crate) fn link(&mut self, item: ItemId, node: NodeId) {
        if let Some(entry) = self.entries.get_mut(&item) {
            entry.nodes.push(node);
        }
    }

    pub fn get(&self, item: ItemId) -> Option<&HeaderEntry> {
        self.entries.get(&item)
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.entries.contains_key(&item)
    }

    pub fn count(&self, item: ItemId) -> Option<u64> {
        self.entries.get(&item).map(HeaderEntry::count)
    }

    pub fn rank(&self, item: ItemId) -> Option<usize> {
        self.entries.get(&item).map(HeaderEntry::rank)
    }

    /// Node indices holding `item`; empty if the item did not survive pruning.
    pub fn chain(&self, item: ItemId) -> &[NodeId] {
        self.entries
            .get(&item)
            .map(HeaderEntry::nodes)
            .unwrap_or(&[])
    }

    /// Items from most to least frequent.
    pub fn items(&self) -> &[ItemId] {
        &self.order
    }

    /// Items from least to most frequent, the order the miner peels them off in.
    pub fn items_ascending(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.order.iter().rev().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
