//! Error types for netgraph-parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unresolved value: {0}")]
    UnresolvedValue(String),

    #[error("instance {instance} references unknown subcircuit: {name}")]
    UnknownSubcircuit { instance: String, name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
