//! DC operating point analysis.

use std::collections::HashMap;

use circuitlab_core::mna::MnaSystem;
use circuitlab_core::{GROUND_LABEL, Netlist, NodeId};
use nalgebra::DVector;

use crate::error::Result;
use crate::linear::solve_dense;

/// Raw result of a DC operating point analysis.
#[derive(Debug, Clone)]
pub struct DcSolution {
    /// Node voltages (indexed by node number - 1, ground is implicit 0V).
    pub node_voltages: DVector<f64>,
    /// Branch currents through voltage-defining elements.
    pub branch_currents: DVector<f64>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
}

impl DcSolution {
    /// Get the voltage at a node.
    pub fn voltage(&self, node: NodeId) -> f64 {
        match node.matrix_index() {
            Some(idx) if idx < self.num_nodes => self.node_voltages[idx],
            _ => 0.0,
        }
    }

    /// Get the voltage difference between two nodes.
    pub fn voltage_diff(&self, node_pos: NodeId, node_neg: NodeId) -> f64 {
        self.voltage(node_pos) - self.voltage(node_neg)
    }

    /// Get a branch current by index.
    pub fn current(&self, index: usize) -> f64 {
        if index < self.branch_currents.len() {
            self.branch_currents[index]
        } else {
            0.0
        }
    }
}

/// Solve the DC operating point for a pre-assembled MNA system.
pub fn solve_dc(mna: &MnaSystem) -> Result<DcSolution> {
    let solution = solve_dense(mna.matrix(), mna.rhs())?;

    let num_nodes = mna.num_nodes;
    let num_branches = mna.num_branches;

    let node_voltages = DVector::from_iterator(num_nodes, solution.iter().take(num_nodes).copied());
    let branch_currents =
        DVector::from_iterator(num_branches, solution.iter().skip(num_nodes).copied());

    Ok(DcSolution {
        node_voltages,
        branch_currents,
        num_nodes,
    })
}

/// A DC operating point addressed the way the netlist was built:
/// voltages by node label, currents by device name.
#[derive(Debug, Clone)]
pub struct OperatingPoint {
    solution: DcSolution,
    nodes: HashMap<String, NodeId>,
    branches: HashMap<String, usize>,
}

impl OperatingPoint {
    /// Pair a raw solution with the labels of the netlist it came from.
    pub fn new(netlist: &Netlist, solution: DcSolution) -> Self {
        let nodes = netlist
            .nodes()
            .map(|node| (node.label().to_string(), node.id()))
            .collect();
        let branches = netlist
            .devices()
            .iter()
            .filter_map(|device| Some((device.name().to_string(), device.branch_index()?)))
            .collect();
        Self {
            solution,
            nodes,
            branches,
        }
    }

    /// Voltage at the node with the given label.
    pub fn voltage(&self, label: &str) -> Option<f64> {
        if label == GROUND_LABEL {
            return Some(0.0);
        }
        self.nodes.get(label).map(|&id| self.solution.voltage(id))
    }

    /// Branch current of the named voltage-defining device.
    pub fn current(&self, name: &str) -> Option<f64> {
        self.branches
            .get(name)
            .map(|&idx| self.solution.current(idx))
    }

    /// The underlying raw solution.
    pub fn solution(&self) -> &DcSolution {
        &self.solution
    }
}
