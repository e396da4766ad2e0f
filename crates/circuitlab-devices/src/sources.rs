//! Independent voltage source.

use circuitlab_core::mna::MnaSystem;
use circuitlab_core::{Element, NodeId, Stamper};

use crate::error::{Error, Result};

/// An independent voltage source enforcing `V(pos) - V(neg) = voltage`.
///
/// A zero-valued source is used as an ammeter: its branch current is the
/// current entering `node_pos` and leaving through `node_neg`.
#[derive(Debug, Clone)]
pub struct VoltageSource {
    /// Device name (e.g., "Vbattery1").
    pub name: String,
    /// Positive terminal node.
    pub node_pos: NodeId,
    /// Negative terminal node.
    pub node_neg: NodeId,
    /// DC voltage value in volts.
    pub voltage: f64,
    /// Index of the current variable for this source.
    pub current_index: usize,
}

impl VoltageSource {
    /// Create a new voltage source.
    pub fn new(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        voltage: f64,
        current_index: usize,
    ) -> Result<Self> {
        let name = name.into();
        if !voltage.is_finite() {
            return Err(Error::InvalidValue {
                name,
                value: voltage,
            });
        }
        Ok(Self {
            name,
            node_pos,
            node_neg,
            voltage,
            current_index,
        })
    }

    /// Create a zero-valued source used only to measure branch current.
    pub fn ammeter(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        current_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            node_pos,
            node_neg,
            voltage: 0.0,
            current_index,
        }
    }
}

impl Element for VoltageSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn nodes(&self) -> Vec<NodeId> {
        vec![self.node_pos, self.node_neg]
    }

    fn num_current_vars(&self) -> usize {
        1
    }

    fn voltage_constraints(&self) -> Vec<(NodeId, NodeId)> {
        vec![(self.node_pos, self.node_neg)]
    }
}

impl Stamper for VoltageSource {
    fn stamp(&self, mna: &mut MnaSystem) {
        mna.stamp_voltage_source(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.current_index,
            self.voltage,
        );
    }

    fn branch_index(&self) -> Option<usize> {
        Some(self.current_index)
    }
}
