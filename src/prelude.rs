//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kyoki crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use kyoki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let config = MiningConfig::from_file("path/to/config.json")?;
//! let set = TransactionFile::from_file("path/to/transactions.json")?.into_transactions()?;
//!
//! let engine = Engine::builder().min_support(config.min_support).build()?;
//! let model = engine.run(set.transactions())?;
//! println!("Mined {} rules", model.rules().len());
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::config::MiningConfig;
pub use crate::engine::{Engine, EngineBuilder, MinedModel, RunStats};

// Stages
pub use crate::index::{Recommendation, RecommendationIndex, ScoredItem};
pub use crate::miner::{CancelToken, Itemset, PatternMiner};
pub use crate::rules::{AntecedentSet, ConsequentSize, Rule, RuleFormatter, RuleGenerator, RuleSet};
pub use crate::tree::{FpNode, FpTree, HeaderTable};

// Data model
pub use crate::data::TransactionFile;
pub use crate::item::{ItemCatalog, ItemId};
pub use crate::transaction::{Interaction, IntoTransactions, Transaction, TransactionSet};

// Error types
pub use crate::error::{ConfigError, IngestError, MiningError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
