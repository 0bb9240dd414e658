//! # Kyoki - Co-occurrence Mining and Recommendation Engine
//!
//! **Kyoki** finds items that are commonly chosen together (for example books
//! rated by the same readers) and answers "given item X, what else goes with
//! it?" queries. It mines frequent itemsets with FP-growth, derives
//! confidence-scored association rules from them, and indexes the rules for
//! fast point lookups.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Data**: Parse interaction records from whatever format you have.
//! 2.  **Convert to Transactions**: Implement `IntoTransactions` (or use the
//!     provided impls for `Vec<Interaction>` and `Vec<Vec<String>>`) to get a
//!     `TransactionSet`: one set of item ids per user, plus the `ItemCatalog`
//!     that maps ids back to names.
//! 3.  **Mine**: Use `Engine::builder` to set the support and confidence
//!     thresholds, then `run` the engine over the transactions.
//! 4.  **Query**: The resulting `MinedModel` exposes the itemsets, the rules
//!     (one per antecedent) and a recommendation index.
//!
//! ## Quick Start
//!
//! ```rust
//! use kyoki::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let set = TransactionSet::from_named(vec![
//!         vec!["Dune", "Emma"],
//!         vec!["Dune", "Emma"],
//!         vec!["Dune", "Emma"],
//!         vec!["Dune", "Ulysses"],
//!     ]);
//!
//!     let engine = Engine::builder().min_support(3).min_confidence(0.5).build()?;
//!     let model = engine.run(set.transactions())?;
//!
//!     let catalog = set.catalog();
//!     for rule in model.rules().sorted() {
//!         println!("{}", RuleFormatter::format_scored(rule, catalog));
//!     }
//!
//!     let emma = catalog.id("Emma").ok_or("unknown title")?;
//!     match model.query(emma) {
//!         Recommendation::Matched(items) => println!("-> {:?}", catalog.resolve(&items)),
//!         Recommendation::NoMatch => println!("-> No recommendations found"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod index;
pub mod item;
pub mod miner;
pub mod prelude;
pub mod rules;
pub mod transaction;
pub mod tree;
