use thiserror::Error;

/// Errors raised while validating or loading a mining configuration.
///
/// These are deterministic: re-running with the same input fails the same way,
/// so callers should surface them instead of retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Minimum support must be at least 1, but was {0}")]
    InvalidMinSupport(u64),

    #[error("Minimum confidence must be in (0, 1], but was {0}")]
    InvalidMinConfidence(f64),

    #[error("top_k must be at least 1 when set")]
    InvalidTopK,

    #[error("Could not read config file '{path}': {message}")]
    ReadFile { path: String, message: String },

    #[error("Failed to parse config JSON: {0}")]
    Parse(String),
}

/// Errors that can end a mining run before it produces a model.
///
/// An aborted run never hands back the itemsets or rules it had found so far.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MiningError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Mining run was cancelled")]
    Cancelled,

    #[error("Mining run exceeded its deadline after {elapsed_ms} ms")]
    DeadlineExceeded { elapsed_ms: u128 },
}

/// Errors that can occur when converting collaborator records into a `TransactionSet`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    #[error("Invalid interaction data: {0}")]
    Validation(String),

    #[error("Could not read file '{path}': {message}")]
    ReadFile { path: String, message: String },

    #[error("Could not write file '{path}': {message}")]
    WriteFile { path: String, message: String },

    #[error("Failed to parse transactions: {0}")]
    Parse(String),
}
