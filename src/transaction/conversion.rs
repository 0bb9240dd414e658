use super::definition::TransactionSet;
use crate::error::IngestError;
use std::collections::{BTreeMap, BTreeSet};

/// A single (user, item, rating) record as produced by an ingestion collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub user: String,
    pub item: String,
    pub rating: f64,
}

impl Interaction {
    pub fn new(user: impl Into<String>, item: impl Into<String>, rating: f64) -> Self {
        Self {
            user: user.into(),
            item: item.into(),
            rating,
        }
    }

    /// Any rating above zero counts as a positive interaction.
    pub fn is_positive(&self) -> bool {
        self.rating > 0.0
    }
}

/// A trait for custom data models that can be converted into a `TransactionSet`.
///
/// This is the seam between whatever raw format the interaction data arrives in
/// and the mining engine, which only ever sees sets of item ids.
///
/// # Example
///
/// ```rust
/// use kyoki::error::IngestError;
/// use kyoki::transaction::{IntoTransactions, TransactionSet};
///
/// struct Basket { books: Vec<String> }
/// struct Shop { baskets: Vec<Basket> }
///
/// impl IntoTransactions for Shop {
///     fn into_transactions(self) -> Result<TransactionSet, IngestError> {
///         Ok(TransactionSet::from_named(self.baskets.into_iter().map(|b| b.books)))
///     }
/// }
///
/// let shop = Shop { baskets: vec![Basket { books: vec!["Dune".to_string()] }] };
/// let set = shop.into_transactions().unwrap();
/// assert_eq!(set.len(), 1);
/// ```
pub trait IntoTransactions {
    /// Consumes the object and converts it into per-user transactions.
    fn into_transactions(self) -> Result<TransactionSet, IngestError>;
}

impl IntoTransactions for Vec<Interaction> {
    /// Groups positive interactions by user. Repeated (user, item) pairs collapse
    /// into one, and users without a single positive interaction are dropped.
    fn into_transactions(self) -> Result<TransactionSet, IngestError> {
        let mut baskets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (row, interaction) in self.into_iter().enumerate() {
            if interaction.user.trim().is_empty() {
                return Err(IngestError::Validation(format!(
                    "Row {} has an empty user id",
                    row
                )));
            }
            if interaction.item.trim().is_empty() {
                return Err(IngestError::Validation(format!(
                    "Row {} has an empty item id",
                    row
                )));
            }
            if !interaction.rating.is_finite() {
                return Err(IngestError::Validation(format!(
                    "Row {} has a non-finite rating: {}",
                    row, interaction.rating
                )));
            }
            if interaction.is_positive() {
                baskets
                    .entry(interaction.user)
                    .or_default()
                    .insert(interaction.item);
            }
        }
        Ok(TransactionSet::from_named(baskets.into_values()))
    }
}

impl IntoTransactions for Vec<Vec<String>> {
    fn into_transactions(self) -> Result<TransactionSet, IngestError> {
        if let Some(row) = self
            .iter()
            .position(|items| items.iter().any(|item| item.trim().is_empty()))
        {
            return Err(IngestError::Validation(format!(
                "Transaction {} contains an empty item id",
                row
            )));
        }
        Ok(TransactionSet::from_named(self))
    }
}
