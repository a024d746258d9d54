//! Error types for netgraph-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown component type code: {0}")]
    UnknownTypeCode(u32),

    #[error("unknown terminal role code: {0}")]
    UnknownRoleCode(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
