//! Primitive DC elements for CircuitLab netlists.
//!
//! The breadboard engine describes every discovered circuit with three
//! primitives:
//! - Independent voltage sources (battery EMF and zero-valued current sensors)
//! - Resistors
//! - Lossless transmission lines standing in for ideal conductors

pub mod error;
pub mod passive;
pub mod sources;
pub mod tline;

pub use error::{Error, Result};
pub use passive::Resistor;
pub use sources::VoltageSource;
pub use tline::TransmissionLine;
