//! Error types for netgraph-export.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
