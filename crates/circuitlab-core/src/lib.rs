//! Core netlist representation and MNA matrix structures for CircuitLab.
//!
//! This crate provides the data structures shared between the breadboard
//! engine and the DC solver: node identifiers, a netlist addressed by node
//! labels and device names, and the Modified Nodal Analysis (MNA) system the
//! devices stamp into.

pub mod element;
pub mod error;
pub mod mna;
pub mod netlist;
pub mod node;
pub mod units;

pub use element::Element;
pub use error::{Error, Result};
pub use mna::MnaSystem;
pub use netlist::{BoxedStamper, GROUND_LABEL, Netlist, Stamper};
pub use node::{Node, NodeId};
