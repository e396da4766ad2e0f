//! Error types for circuitlab-solver.

use thiserror::Error;

use crate::validate::RuleViolation;

#[derive(Debug, Error)]
pub enum Error {
    #[error("singular matrix")]
    SingularMatrix,

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("netlist validation failed with {} violation(s)", violations.len())]
    ValidationFailed { violations: Vec<RuleViolation> },

    #[error("solution is not finite")]
    NonFiniteSolution,

    #[error("solver error: {0}")]
    SolverError(String),
}

impl Error {
    /// Rule violations behind a validation failure, empty for other errors.
    pub fn violations(&self) -> &[RuleViolation] {
        match self {
            Error::ValidationFailed { violations } => violations,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
