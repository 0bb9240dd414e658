use crate::item::{ItemCatalog, ItemId};

/// One user's positively-interacted items.
///
/// Items are kept sorted and free of duplicates; the order callers supply them
/// in carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Transaction {
    items: Vec<ItemId>,
}

impl Transaction {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self { items }
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    /// True if every item of `itemset` is part of this transaction.
    pub fn contains_all(&self, itemset: &[ItemId]) -> bool {
        itemset.iter().all(|item| self.contains(*item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ItemId> for Transaction {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// An immutable snapshot of transactions together with the catalog their ids
/// were interned from.
#[derive(Debug, Clone, Default)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
    catalog: ItemCatalog,
}

impl TransactionSet {
    pub fn new(transactions: Vec<Transaction>, catalog: ItemCatalog) -> Self {
        Self {
            transactions,
            catalog,
        }
    }

    /// Interns rows of item names into a catalog and id-based transactions.
    pub fn from_named<R, T, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let catalog = ItemCatalog::from_names(rows.iter().flatten().cloned());
        let transactions = rows
            .iter()
            .map(|row| row.iter().filter_map(|name| catalog.id(name)).collect())
            .collect();
        Self {
            transactions,
            catalog,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn into_parts(self) -> (Vec<Transaction>, ItemCatalog) {
        (self.transactions, self.catalog)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Exact number of transactions that contain every item of `itemset`.
    pub fn support_of(&self, itemset: &[ItemId]) -> u64 {
        self.transactions
            .iter()
            .filter(|t| t.contains_all(itemset))
            .count() as u64
    }
}
