//! Common test utilities for building transaction sets and checking results.
use kyoki::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Builds a `TransactionSet` from rows of item names.
#[allow(dead_code)]
pub fn named(rows: &[&[&str]]) -> TransactionSet {
    TransactionSet::from_named(rows.iter().map(|row| row.iter().copied()))
}

/// Resolves names to ids, panicking on unknown names.
#[allow(dead_code)]
pub fn ids(set: &TransactionSet, names: &[&str]) -> Vec<ItemId> {
    let mut ids: Vec<ItemId> = names
        .iter()
        .map(|name| {
            set.catalog()
                .id(name)
                .unwrap_or_else(|| panic!("unknown item '{}'", name))
        })
        .collect();
    ids.sort();
    ids
}

#[allow(dead_code)]
pub fn id(set: &TransactionSet, name: &str) -> ItemId {
    ids(set, &[name])[0]
}

/// Three readers of A and B, one reader of A and C.
///
/// With min_support 3 the frequent itemsets are {A}:4, {B}:3 and {A,B}:3.
#[allow(dead_code)]
pub fn create_pair_scenario() -> TransactionSet {
    named(&[&["A", "B"], &["A", "B"], &["A", "B"], &["A", "C"]])
}

/// A small club where A is read by everyone, B by most and C by a pair.
///
/// Supports: A5 B4 C2 AB4 AC2 BC2 ABC2.
#[allow(dead_code)]
pub fn create_reading_club() -> TransactionSet {
    named(&[
        &["A", "B", "C"],
        &["A", "B", "C"],
        &["A", "B"],
        &["A", "B"],
        &["A"],
    ])
}

/// The nine-transaction example from Han, Pei and Yin's FP-growth paper,
/// mined with min_support 2 into 13 frequent itemsets.
#[allow(dead_code)]
pub fn create_textbook_transactions() -> TransactionSet {
    named(&[
        &["I1", "I2", "I5"],
        &["I2", "I4"],
        &["I2", "I3"],
        &["I1", "I2", "I4"],
        &["I1", "I3"],
        &["I2", "I3"],
        &["I1", "I3"],
        &["I1", "I2", "I3", "I5"],
        &["I1", "I2", "I3"],
    ])
}

/// Turns raw numeric rows into transactions with `ItemId(n)` items.
#[allow(dead_code)]
pub fn from_raw(rows: &[BTreeSet<u32>]) -> Vec<Transaction> {
    rows.iter()
        .map(|row| Transaction::new(row.iter().copied().map(ItemId)))
        .collect()
}

/// Every itemset meeting `min_support`, found by counting every subset of the
/// item universe directly. Only usable on small universes.
#[allow(dead_code)]
pub fn brute_force_itemsets(
    transactions: &[Transaction],
    min_support: u64,
) -> BTreeMap<Vec<ItemId>, u64> {
    let universe: Vec<ItemId> = transactions
        .iter()
        .flat_map(|t| t.items().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    assert!(universe.len() <= 16, "universe too large for brute force");

    let mut frequent = BTreeMap::new();
    for mask in 1u32..(1 << universe.len()) {
        let items: Vec<ItemId> = universe
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, item)| *item)
            .collect();
        let support = transactions.iter().filter(|t| t.contains_all(&items)).count() as u64;
        if support >= min_support {
            frequent.insert(items, support);
        }
    }
    frequent
}

/// Mined itemsets keyed by their items; panics on duplicates.
#[allow(dead_code)]
pub fn as_map(itemsets: &[Itemset]) -> BTreeMap<Vec<ItemId>, u64> {
    let mut map = BTreeMap::new();
    for itemset in itemsets {
        let previous = map.insert(itemset.items().to_vec(), itemset.support());
        assert!(previous.is_none(), "itemset {:?} emitted twice", itemset.items());
    }
    map
}
