//! Resistor model.

use circuitlab_core::mna::MnaSystem;
use circuitlab_core::{Element, NodeId, Stamper};

use crate::error::{Error, Result};

/// A linear resistor.
#[derive(Debug, Clone)]
pub struct Resistor {
    /// Device name (e.g., "bulb1").
    pub name: String,
    /// Positive terminal node.
    pub node_pos: NodeId,
    /// Negative terminal node.
    pub node_neg: NodeId,
    /// Resistance value in ohms.
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor. The resistance must be finite and positive.
    pub fn new(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        resistance: f64,
    ) -> Result<Self> {
        let name = name.into();
        if !(resistance.is_finite() && resistance > 0.0) {
            return Err(Error::InvalidValue {
                name,
                value: resistance,
            });
        }
        Ok(Self {
            name,
            node_pos,
            node_neg,
            resistance,
        })
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

impl Element for Resistor {
    fn name(&self) -> &str {
        &self.name
    }

    fn nodes(&self) -> Vec<NodeId> {
        vec![self.node_pos, self.node_neg]
    }
}

impl Stamper for Resistor {
    fn stamp(&self, mna: &mut MnaSystem) {
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.conductance(),
        );
    }
}
