//! Error types for circuitlab-devices.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("device {name} has invalid value: {value}")]
    InvalidValue { name: String, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
