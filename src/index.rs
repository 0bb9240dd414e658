//! Reverse lookup from an item to the rules whose antecedent mentions it.

use crate::item::ItemId;
use crate::rules::{Rule, RuleSet};
use ahash::AHashMap;
use std::collections::BTreeSet;

/// The outcome of a recommendation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    /// No rule has the seed item in its antecedent.
    NoMatch,
    /// At least one rule matched; these are its consequent items minus the seed.
    Matched(BTreeSet<ItemId>),
}

impl Recommendation {
    pub fn is_match(&self) -> bool {
        matches!(self, Recommendation::Matched(_))
    }

    pub fn items(&self) -> Option<&BTreeSet<ItemId>> {
        match self {
            Recommendation::Matched(items) => Some(items),
            Recommendation::NoMatch => None,
        }
    }

    pub fn into_items(self) -> Option<BTreeSet<ItemId>> {
        match self {
            Recommendation::Matched(items) => Some(items),
            Recommendation::NoMatch => None,
        }
    }
}

/// A recommended item scored by the best rule that recommends it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem {
    pub item: ItemId,
    pub confidence: f64,
    pub support: u64,
}

/// Answers "what else is chosen with X?" from a mined [`RuleSet`].
///
/// The index is derived data: rebuild it whenever the rules change.
#[derive(Debug, Clone, Default)]
pub struct RecommendationIndex {
    rules: Vec<Rule>,
    by_item: AHashMap<ItemId, Vec<usize>>,
}

impl RecommendationIndex {
    /// Indexes every rule once per item of its antecedent.
    pub fn build(rules: &RuleSet) -> Self {
        let rules: Vec<Rule> = rules.sorted().into_iter().cloned().collect();
        let mut by_item: AHashMap<ItemId, Vec<usize>> = AHashMap::new();
        for (position, rule) in rules.iter().enumerate() {
            for item in rule.antecedent().items() {
                by_item.entry(*item).or_default().push(position);
            }
        }
        Self { rules, by_item }
    }

    /// Unions the consequents of every rule whose antecedent contains `seed`.
    ///
    /// The seed itself is never recommended.
    pub fn query(&self, seed: ItemId) -> Recommendation {
        let Some(positions) = self.by_item.get(&seed) else {
            return Recommendation::NoMatch;
        };
        let mut items: BTreeSet<ItemId> = positions
            .iter()
            .flat_map(|&position| self.rules[position].consequent().iter().copied())
            .collect();
        items.remove(&seed);
        Recommendation::Matched(items)
    }

    /// The same items as [`query`](Self::query), best first.
    ///
    /// Each item is scored by the highest-confidence matching rule that
    /// recommends it (support breaks ties, then the item id). Returns `None`
    /// when nothing matches. Truncating to a top-k is left to the caller.
    pub fn query_ranked(&self, seed: ItemId) -> Option<Vec<ScoredItem>> {
        let positions = self.by_item.get(&seed)?;
        let mut best: AHashMap<ItemId, ScoredItem> = AHashMap::new();
        for rule in positions.iter().map(|&position| &self.rules[position]) {
            for &item in rule.consequent().iter().filter(|item| **item != seed) {
                let candidate = ScoredItem {
                    item,
                    confidence: rule.confidence(),
                    support: rule.support(),
                };
                best.entry(item)
                    .and_modify(|current| {
                        if Self::score_cmp(&candidate, current).is_lt() {
                            *current = candidate;
                        }
                    })
                    .or_insert(candidate);
            }
        }
        let mut ranked: Vec<ScoredItem> = best.into_values().collect();
        ranked.sort_by(Self::score_cmp);
        Some(ranked)
    }

    /// Best-first ordering of scored items.
    fn score_cmp(a: &ScoredItem, b: &ScoredItem) -> std::cmp::Ordering {
        b.confidence
            .total_cmp(&a.confidence)
            .then(b.support.cmp(&a.support))
            .then(a.item.cmp(&b.item))
    }

    /// Rules whose antecedent contains `item`.
    pub fn rules_for(&self, item: ItemId) -> impl Iterator<Item = &Rule> {
        self.by_item
            .get(&item)
            .into_iter()
            .flatten()
            .map(|&position| &self.rules[position])
    }

    /// Every item that appears in at least one antecedent, i.e. every seed
    /// that will produce a match.
    pub fn all_antecedent_items(&self) -> BTreeSet<ItemId> {
        self.by_item.keys().copied().collect()
    }

    /// Number of indexed rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
