//! FP-growth pattern mining over an [`FpTree`].
//!
//! Mining peels items off the header table from least to most frequent. For
//! each item it emits the item joined with the current suffix, builds the
//! item's conditional tree and recurses into it. Each recursion works on a
//! strictly smaller item universe, so it always terminates.

use crate::error::{ConfigError, MiningError};
use crate::item::ItemId;
use crate::transaction::Transaction;
use crate::tree::FpTree;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

mod cancel;
mod frame;

pub use cancel::CancelToken;
use frame::Frame;

/// A frequent itemset and the number of transactions containing all of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Itemset {
    items: Vec<ItemId>,
    support: u64,
}

impl Itemset {
    pub fn new<I>(items: I, support: u64) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self { items, support }
    }

    /// The items, sorted ascending.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn support(&self) -> u64 {
        self.support
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        self.items.iter().all(|item| other.contains(*item))
    }
}

/// Mines frequent itemsets from FP-trees.
#[derive(Debug, Clone)]
pub struct PatternMiner {
    min_support: u64,
    parallel: bool,
    cancel: CancelToken,
}

impl PatternMiner {
    /// Creates a miner; `min_support` is an absolute transaction count.
    pub fn new(min_support: u64) -> Result<Self, ConfigError> {
        if min_support < 1 {
            return Err(ConfigError::InvalidMinSupport(min_support));
        }
        Ok(Self {
            min_support,
            parallel: false,
            cancel: CancelToken::new(),
        })
    }

    /// Mine independent conditional trees on the rayon pool.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn min_support(&self) -> u64 {
        self.min_support
    }

    /// Lazily yields every frequent itemset of `tree`.
    ///
    /// The iterator is single-use: work is done as it is advanced, and a new
    /// call mines from scratch. It ignores cancellation and parallelism; use
    /// [`mine_all`](Self::mine_all) for those.
    pub fn mine(&self, tree: FpTree) -> Itemsets {
        Itemsets {
            min_support: self.min_support,
            pending: vec![Frame::root(tree)],
            ready: VecDeque::new(),
        }
    }

    /// Mines every frequent itemset of `tree`, checking the cancel token
    /// between recursion steps.
    ///
    /// On cancellation nothing found so far is returned.
    pub fn mine_all(&self, tree: FpTree) -> Result<Vec<Itemset>, MiningError> {
        self.mine_frame(Frame::root(tree))
    }

    /// Builds the tree for `transactions` and mines it.
    pub fn mine_transactions(
        &self,
        transactions: &[Transaction],
    ) -> Result<Vec<Itemset>, MiningError> {
        self.cancel.checkpoint()?;
        self.mine_all(FpTree::build(transactions, self.min_support))
    }

    fn mine_frame(&self, frame: Frame) -> Result<Vec<Itemset>, MiningError> {
        self.cancel.checkpoint()?;

        let mut found = Vec::new();
        let children = frame.expand(self.min_support, &mut found);

        if self.parallel && children.len() > 1 {
            let nested = children
                .into_par_iter()
                .map(|child| self.mine_frame(child))
                .collect::<Result<Vec<_>, _>>()?;
            found.extend(nested.into_iter().flatten());
        } else {
            for child in children {
                found.extend(self.mine_frame(child)?);
            }
        }
        Ok(found)
    }
}

/// Lazy, single-use sequence of frequent itemsets returned by [`PatternMiner::mine`].
pub struct Itemsets {
    min_support: u64,
    pending: Vec<Frame>,
    ready: VecDeque<Itemset>,
}

impl Iterator for Itemsets {
    type Item = Itemset;

    fn next(&mut self) -> Option<Itemset> {
        loop {
            if let Some(itemset) = self.ready.pop_front() {
                return Some(itemset);
            }
            let frame = self.pending.pop()?;
            let mut emitted = Vec::new();
            let children = frame.expand(self.min_support, &mut emitted);
            self.ready.extend(emitted);
            self.pending.extend(children);
        }
    }
}
