//! DC operating point solver for CircuitLab netlists.
//!
//! This crate provides:
//! - Dense linear solves of the MNA system
//! - DC operating point analysis with label-addressed readback
//! - Netlist validation rules run before solving
//! - The [`DcSolver`] seam the breadboard engine calls through

pub mod dc;
pub mod error;
pub mod linear;
pub mod solver;
pub mod validate;

pub use dc::{DcSolution, OperatingPoint, solve_dc};
pub use error::{Error, Result};
pub use solver::{DcSolver, MnaSolver};
pub use validate::{RuleViolation, validate_netlist};
