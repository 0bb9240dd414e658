//! The end-to-end pipeline: transactions -> FP-tree -> itemsets -> rules -> index.

use crate::config::MiningConfig;
use crate::error::{ConfigError, MiningError};
use crate::index::{Recommendation, RecommendationIndex, ScoredItem};
use crate::item::ItemId;
use crate::miner::{CancelToken, Itemset, PatternMiner};
use crate::rules::{ConsequentSize, RuleGenerator, RuleSet};
use crate::transaction::Transaction;
use crate::tree::FpTree;
use ahash::AHashMap;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configures an [`Engine`]. Thresholds are validated in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: MiningConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: MiningConfig) -> Self {
        Self { config }
    }

    pub fn min_support(mut self, min_support: u64) -> Self {
        self.config.min_support = min_support;
        self
    }

    pub fn min_confidence(mut self, min_confidence: f64) -> Self {
        self.config.min_confidence = min_confidence;
        self
    }

    pub fn top_k(mut self, top_k: Option<usize>) -> Self {
        self.config.top_k = top_k;
        self
    }

    pub fn consequents(mut self, consequents: ConsequentSize) -> Self {
        self.config.consequents = consequents;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline_ms = Some(u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn build(self) -> Result<Engine, ConfigError> {
        self.config.validate()?;
        Ok(Engine {
            config: self.config,
        })
    }
}

/// Runs the mining pipeline over immutable transaction snapshots.
#[derive(Debug, Clone)]
pub struct Engine {
    config: MiningConfig,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Mines `transactions` into a queryable model.
    ///
    /// Zero transactions, itemsets or rules all produce a valid, empty model.
    /// A cancelled or timed-out run returns an error and no partial results.
    pub fn run(&self, transactions: &[Transaction]) -> Result<MinedModel, MiningError> {
        self.run_with_cancel(transactions, &CancelToken::new())
    }

    /// Like [`run`](Self::run), but `cancel` can abort this run from another
    /// thread. The configured deadline applies on top of any deadline the
    /// token already carries; whichever expires first stops the run.
    pub fn run_with_cancel(
        &self,
        transactions: &[Transaction],
        cancel: &CancelToken,
    ) -> Result<MinedModel, MiningError> {
        let started = Instant::now();
        let cancel = match self.config.deadline_ms {
            Some(ms) => cancel.with_timeout(Duration::from_millis(ms)),
            None => cancel.clone(),
        };
        info!(
            transactions = transactions.len(),
            min_support = self.config.min_support,
            min_confidence = self.config.min_confidence,
            parallel = self.config.parallel,
            "mining run started"
        );

        match self.mine_stages(transactions, &cancel) {
            Ok((itemsets, rules, stats)) => {
                let index = RecommendationIndex::build(&rules);
                let stats = RunStats {
                    elapsed: started.elapsed(),
                    ..stats
                };
                info!(
                    itemsets = itemsets.len(),
                    rules = rules.len(),
                    pickable_items = index.all_antecedent_items().len(),
                    elapsed_ms = stats.elapsed.as_millis() as u64,
                    "mining run finished"
                );
                Ok(MinedModel {
                    itemsets,
                    rules,
                    index,
                    top_k: self.config.top_k,
                    stats,
                })
            }
            Err(e) => {
                warn!(error = %e, "mining run aborted; discarding partial results");
                Err(e)
            }
        }
    }

    fn mine_stages(
        &self,
        transactions: &[Transaction],
        cancel: &CancelToken,
    ) -> Result<(Vec<Itemset>, RuleSet, RunStats), MiningError> {
        let miner = PatternMiner::new(self.config.min_support)?
            .with_parallelism(self.config.parallel)
            .with_cancel_token(cancel.clone());
        let generator =
            RuleGenerator::new(self.config.min_confidence)?.with_consequents(self.config.consequents);

        cancel.checkpoint()?;
        let tree = FpTree::build(transactions, self.config.min_support);
        let stats = RunStats {
            transactions: transactions.len(),
            frequent_items: tree.header().len(),
            tree_nodes: tree.node_count(),
            elapsed: Duration::ZERO,
        };

        let itemsets = miner.mine_all(tree)?;
        debug!(itemsets = itemsets.len(), "pattern mining complete");

        cancel.checkpoint()?;
        let rules = generator.generate(&itemsets);
        debug!(rules = rules.len(), "rule generation complete");

        Ok((itemsets, rules, stats))
    }
}

/// Size and timing figures of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub transactions: usize,
    /// Items meeting the support threshold on their own.
    pub frequent_items: usize,
    pub tree_nodes: usize,
    pub elapsed: Duration,
}

/// The product of a successful run: itemsets, rules, and the index over them.
#[derive(Debug, Clone)]
pub struct MinedModel {
    itemsets: Vec<Itemset>,
    rules: RuleSet,
    index: RecommendationIndex,
    top_k: Option<usize>,
    stats: RunStats,
}

impl MinedModel {
    pub fn itemsets(&self) -> &[Itemset] {
        &self.itemsets
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn index(&self) -> &RecommendationIndex {
        &self.index
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Support of an exact itemset, if it was mined.
    pub fn support_of(&self, items: &[ItemId]) -> Option<u64> {
        let wanted = Itemset::new(items.iter().copied(), 0);
        self.itemsets
            .iter()
            .find(|itemset| itemset.items() == wanted.items())
            .map(Itemset::support)
    }

    /// Every mined itemset keyed by its sorted items.
    pub fn support_table(&self) -> AHashMap<Vec<ItemId>, u64> {
        self.itemsets
            .iter()
            .map(|itemset| (itemset.items().to_vec(), itemset.support()))
            .collect()
    }

    pub fn query(&self, seed: ItemId) -> Recommendation {
        self.index.query(seed)
    }

    /// Ranked recommendations for `seed`, cut to the configured `top_k`.
    pub fn recommend(&self, seed: ItemId) -> Option<Vec<ScoredItem>> {
        let mut ranked = self.index.query_ranked(seed)?;
        if let Some(k) = self.top_k {
            ranked.truncate(k);
        }
        Some(ranked)
    }

    pub fn all_antecedent_items(&self) -> BTreeSet<ItemId> {
        self.index.all_antecedent_items()
    }
}
