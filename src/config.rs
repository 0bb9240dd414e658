use crate::error::ConfigError;
use crate::rules::ConsequentSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Thresholds and run options for a mining run.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```json
/// { "min_support": 50, "min_confidence": 0.6, "top_k": 10 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum absolute number of transactions an itemset must appear in.
    pub min_support: u64,
    /// Minimum conditional probability for a rule to be kept, in (0, 1].
    pub min_confidence: f64,
    /// Cap on recommendations returned to end users. Applied by callers, not
    /// by the index.
    pub top_k: Option<usize>,
    pub consequents: ConsequentSize,
    /// Mine conditional trees on the rayon pool.
    pub parallel: bool,
    /// Abort mining once this many milliseconds have elapsed.
    pub deadline_ms: Option<u64>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 100,
            min_confidence: 0.5,
            top_k: Some(5),
            consequents: ConsequentSize::Single,
            parallel: true,
            deadline_ms: None,
        }
    }
}

impl MiningConfig {
    /// Loads a config from a JSON file and validates it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects thresholds that could never produce a meaningful run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_support < 1 {
            return Err(ConfigError::InvalidMinSupport(self.min_support));
        }
        if !(self.min_confidence > 0.0 && self.min_confidence <= 1.0) {
            return Err(ConfigError::InvalidMinConfidence(self.min_confidence));
        }
        if self.top_k == Some(0) {
            return Err(ConfigError::InvalidTopK);
        }
        Ok(())
    }
}
