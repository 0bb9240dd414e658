use crate::error::ConfigError;
use crate::item::ItemId;
use crate::miner::Itemset;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::hash_map::Entry;

mod formatter;

pub use formatter::RuleFormatter;

/// Which consequents are considered when splitting an itemset into rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsequentSize {
    /// One item per consequent.
    #[default]
    Single,
    /// Every non-empty proper subset of the itemset.
    Any,
}

/// The left-hand side of a rule: a sorted, duplicate-free set of items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AntecedentSet(Vec<ItemId>);

impl AntecedentSet {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn items(&self) -> &[ItemId] {
        &self.0
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.0.binary_search(&item).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An implication `antecedent -> consequent` mined from a frequent itemset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    antecedent: AntecedentSet,
    consequent: Vec<ItemId>,
    /// support(antecedent ∪ consequent) / support(antecedent)
    confidence: f64,
    /// Support of antecedent ∪ consequent.
    support: u64,
    antecedent_support: u64,
    consequent_support: u64,
}

impl Rule {
    pub fn antecedent(&self) -> &AntecedentSet {
        &self.antecedent
    }

    /// The consequent items, sorted ascending and disjoint from the antecedent.
    pub fn consequent(&self) -> &[ItemId] {
        &self.consequent
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn support(&self) -> u64 {
        self.support
    }

    pub fn antecedent_support(&self) -> u64 {
        self.antecedent_support
    }

    /// Support of the consequent on its own; 0 if it was never recorded.
    pub fn consequent_support(&self) -> u64 {
        self.consequent_support
    }

    /// Orders two candidates for the same antecedent; `Greater` means `self`
    /// should be kept. Higher confidence wins, then the more supported
    /// consequent, then the lexically smaller consequent.
    pub fn rank_cmp(&self, other: &Rule) -> Ordering {
        self.confidence
            .total_cmp(&other.confidence)
            .then(self.consequent_support.cmp(&other.consequent_support))
            .then_with(|| other.consequent.cmp(&self.consequent))
    }
}

/// The mined rules, at most one per distinct antecedent.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: AHashMap<AntecedentSet, Rule>,
}

impl RuleSet {
    pub fn get(&self, antecedent: &AntecedentSet) -> Option<&Rule> {
        self.rules.get(antecedent)
    }

    /// Looks up the rule for an antecedent given as loose items in any order.
    pub fn get_by_items(&self, items: &[ItemId]) -> Option<&Rule> {
        self.rules.get(&AntecedentSet::new(items.iter().copied()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Rules ordered for browsing: confidence descending, then support
    /// descending, then antecedent ascending.
    pub fn sorted(&self) -> Vec<&Rule> {
        self.rules
            .values()
            .sorted_by(|a, b| {
                b.confidence
                    .total_cmp(&a.confidence)
                    .then(b.support.cmp(&a.support))
                    .then_with(|| a.antecedent.cmp(&b.antecedent))
            })
            .collect()
    }

    pub fn as_map(&self) -> &AHashMap<AntecedentSet, Rule> {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.rules.len() == other.rules.len()
            && self
                .rules
                .iter()
                .all(|(antecedent, rule)| other.rules.get(antecedent) == Some(rule))
    }
}

/// Derives confidence-scored rules from frequent itemsets.
#[derive(Debug, Clone)]
pub struct RuleGenerator {
    min_confidence: f64,
    consequents: ConsequentSize,
}

impl RuleGenerator {
    pub fn new(min_confidence: f64) -> Result<Self, ConfigError> {
        if !(min_confidence > 0.0 && min_confidence <= 1.0) {
            return Err(ConfigError::InvalidMinConfidence(min_confidence));
        }
        Ok(Self {
            min_confidence,
            consequents: ConsequentSize::default(),
        })
    }

    pub fn with_consequents(mut self, consequents: ConsequentSize) -> Self {
        self.consequents = consequents;
        self
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Splits every itemset of two or more items into antecedent/consequent
    /// candidates and keeps the best candidate per antecedent.
    ///
    /// A candidate whose antecedent was not itself mined (it fell below the
    /// support threshold) is skipped.
    pub fn generate(&self, itemsets: &[Itemset]) -> RuleSet {
        let supports: AHashMap<&[ItemId], u64> = itemsets
            .iter()
            .map(|itemset| (itemset.items(), itemset.support()))
            .collect();

        let mut best: AHashMap<AntecedentSet, Rule> = AHashMap::new();
        for itemset in itemsets.iter().filter(|itemset| itemset.len() >= 2) {
            for consequent in self.consequent_candidates(itemset.items()) {
                let antecedent: Vec<ItemId> = itemset
                    .items()
                    .iter()
                    .copied()
                    .filter(|item| !consequent.contains(item))
                    .collect();
                let Some(&antecedent_support) = supports.get(antecedent.as_slice()) else {
                    continue;
                };

                let confidence = itemset.support() as f64 / antecedent_support as f64;
                if confidence < self.min_confidence {
                    continue;
                }

                let consequent_support = supports.get(consequent.as_slice()).copied().unwrap_or(0);
                let rule = Rule {
                    antecedent: AntecedentSet(antecedent),
                    consequent,
                    confidence,
                    support: itemset.support(),
                    antecedent_support,
                    consequent_support,
                };

                match best.entry(rule.antecedent.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(rule);
                    }
                    Entry::Occupied(mut slot) => {
                        if rule.rank_cmp(slot.get()) == Ordering::Greater {
                            slot.insert(rule);
                        }
                    }
                }
            }
        }

        RuleSet { rules: best }
    }

    /// Consequents to try for an itemset; items are sorted, so every
    /// candidate comes out sorted as well.
    fn consequent_candidates(&self, items: &[ItemId]) -> Vec<Vec<ItemId>> {
        match self.consequents {
            ConsequentSize::Single => items.iter().map(|item| vec![*item]).collect(),
            ConsequentSize::Any => (1..items.len())
                .flat_map(|size| items.iter().copied().combinations(size))
                .collect(),
        }
    }
}
