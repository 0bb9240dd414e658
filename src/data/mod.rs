pub mod model;

pub use model::TransactionFile;
