//! Lossless transmission line, DC model.
//!
//! At DC a lossless line has no series impedance: each conductor is a short
//! between its two ports. Each short is stamped as a 0 V source, which keeps
//! the MNA system well conditioned where a near-zero resistor would not.
//!
//! ```text
//! port1+ ===================== port2+
//! port1- ===================== port2-
//! ```
//!
//! When both conductors join the same pair of nodes (a line folded back on
//! itself), only one short is stamped.

use circuitlab_core::mna::MnaSystem;
use circuitlab_core::{Element, NodeId, Stamper};

use crate::error::{Error, Result};

/// Default characteristic impedance (ohms).
pub const DEFAULT_Z0: f64 = 50.0;

/// Default propagation delay (seconds).
pub const DEFAULT_TD: f64 = 1e-9;

/// A lossless transmission line element.
#[derive(Debug, Clone)]
pub struct TransmissionLine {
    /// Device name (e.g., "wire3").
    pub name: String,
    /// Port 1 positive terminal node.
    pub port1_pos: NodeId,
    /// Port 1 negative terminal node.
    pub port1_neg: NodeId,
    /// Port 2 positive terminal node.
    pub port2_pos: NodeId,
    /// Port 2 negative terminal node.
    pub port2_neg: NodeId,
    /// Characteristic impedance in ohms.
    pub z0: f64,
    /// Propagation delay in seconds.
    pub td: f64,
    /// Index of the first branch current variable.
    pub current_base_index: usize,
}

impl TransmissionLine {
    /// Create a new line with default Z0 and delay.
    pub fn new(
        name: impl Into<String>,
        port1: (NodeId, NodeId),
        port2: (NodeId, NodeId),
        current_base_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            port1_pos: port1.0,
            port1_neg: port1.1,
            port2_pos: port2.0,
            port2_neg: port2.1,
            z0: DEFAULT_Z0,
            td: DEFAULT_TD,
            current_base_index,
        }
    }

    /// Override the line parameters. Z0 must be positive, TD non-negative.
    pub fn with_parameters(mut self, z0: f64, td: f64) -> Result<Self> {
        if !(z0.is_finite() && z0 > 0.0) {
            return Err(Error::InvalidValue {
                name: self.name,
                value: z0,
            });
        }
        if !(td.is_finite() && td >= 0.0) {
            return Err(Error::InvalidValue {
                name: self.name,
                value: td,
            });
        }
        self.z0 = z0;
        self.td = td;
        Ok(self)
    }

    /// The DC shorts this line imposes, deduplicated.
    fn shorts(&self) -> Vec<(NodeId, NodeId)> {
        let positive = (self.port1_pos, self.port2_pos);
        let negative = (self.port1_neg, self.port2_neg);

        let mut shorts = Vec::with_capacity(2);
        if positive.0 != positive.1 {
            shorts.push(positive);
        }
        let same_pair = |a: (NodeId, NodeId), b: (NodeId, NodeId)| {
            a == b || (a.0 == b.1 && a.1 == b.0)
        };
        if negative.0 != negative.1 && !shorts.iter().any(|s| same_pair(*s, negative)) {
            shorts.push(negative);
        }
        shorts
    }
}

impl Element for TransmissionLine {
    fn name(&self) -> &str {
        &self.name
    }

    fn nodes(&self) -> Vec<NodeId> {
        vec![
            self.port1_pos,
            self.port1_neg,
            self.port2_pos,
            self.port2_neg,
        ]
    }

    fn num_current_vars(&self) -> usize {
        self.shorts().len()
    }

    fn voltage_constraints(&self) -> Vec<(NodeId, NodeId)> {
        self.shorts()
    }
}

impl Stamper for TransmissionLine {
    fn stamp(&self, mna: &mut MnaSystem) {
        for (i, (left, right)) in self.shorts().into_iter().enumerate() {
            mna.stamp_voltage_source(
                left.matrix_index(),
                right.matrix_index(),
                self.current_base_index + i,
                0.0,
            );
        }
    }

    fn branch_index(&self) -> Option<usize> {
        (!self.shorts().is_empty()).then_some(self.current_base_index)
    }
}
