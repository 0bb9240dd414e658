use crate::error::IngestError;
use crate::transaction::{IntoTransactions, TransactionSet};
use serde::{Deserialize, Serialize};
use std::fs;

/// JSON interchange format for transaction data, as written by `data-gen` and
/// read by `kyoki-cli`:
///
/// ```json
/// { "transactions": [["Dune", "Emma"], ["Dune"]] }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TransactionFile {
    pub transactions: Vec<Vec<String>>,
}

impl TransactionFile {
    /// Load transactions from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, IngestError> {
        let content = fs::read_to_string(path).map_err(|e| IngestError::ReadFile {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        serde_json::from_str(json).map_err(|e| IngestError::Parse(e.to_string()))
    }

    /// Writes the transactions as pretty-printed JSON.
    pub fn save(&self, path: &str) -> Result<(), IngestError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| IngestError::Parse(e.to_string()))?;
        fs::write(path, json).map_err(|e| IngestError::WriteFile {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl IntoTransactions for TransactionFile {
    fn into_transactions(self) -> Result<TransactionSet, IngestError> {
        self.transactions.into_transactions()
    }
}
