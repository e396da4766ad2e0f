//! Error types for circuitlab-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("duplicate device name: {0}")]
    DuplicateDevice(String),

    #[error("invalid node label: {0:?}")]
    InvalidNodeLabel(String),
}

pub type Result<T> = std::result::Result<T, Error>;
