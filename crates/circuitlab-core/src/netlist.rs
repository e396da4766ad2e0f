//! Netlist: the set of primitive elements for one connected circuit.
//!
//! Nodes are addressed by label. The label `"0"` is always ground; every
//! other label is assigned the next free node number on first use.

use indexmap::IndexMap;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::mna::MnaSystem;
use crate::node::{Node, NodeId};

/// Label reserved for the ground node.
pub const GROUND_LABEL: &str = "0";

/// A boxed device that can stamp into an MNA matrix.
pub type BoxedStamper = Box<dyn Stamper>;

/// Trait for devices that can stamp into an MNA matrix.
pub trait Stamper: Element + Send + Sync {
    /// Stamp this device into the MNA system.
    fn stamp(&self, mna: &mut MnaSystem);

    /// Branch current variable index, if this device reports one.
    fn branch_index(&self) -> Option<usize> {
        None
    }
}

/// A complete netlist ready for simulation.
#[derive(Debug, Default)]
pub struct Netlist {
    /// Circuit title.
    title: Option<String>,
    /// Non-ground nodes in creation order.
    nodes: IndexMap<String, Node>,
    /// All devices in the netlist.
    devices: Vec<BoxedStamper>,
    /// Device name -> position in `devices`.
    names: IndexMap<String, usize>,
    /// Total number of branch current variables.
    num_current_vars: usize,
}

impl Netlist {
    /// Create a new empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a netlist with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Get the netlist title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Get or create the node with the given label.
    pub fn node(&mut self, label: &str) -> Result<NodeId> {
        if label == GROUND_LABEL {
            return Ok(NodeId::GROUND);
        }
        if label.trim().is_empty() {
            return Err(Error::InvalidNodeLabel(label.to_string()));
        }
        if let Some(node) = self.nodes.get(label) {
            return Ok(node.id());
        }
        let id = NodeId::new(self.nodes.len() as u32 + 1);
        self.nodes.insert(label.to_string(), Node::new(id, label));
        Ok(id)
    }

    /// Look up an existing node by label.
    pub fn find_node(&self, label: &str) -> Option<NodeId> {
        if label == GROUND_LABEL {
            return Some(NodeId::GROUND);
        }
        self.nodes.get(label).map(Node::id)
    }

    /// Label of a node, if it belongs to this netlist.
    pub fn node_label(&self, id: NodeId) -> Option<&str> {
        if id.is_ground() {
            return Some(GROUND_LABEL);
        }
        self.nodes
            .get_index(id.matrix_index()?)
            .map(|(label, _)| label.as_str())
    }

    /// Iterate over all non-ground nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Add a device to the netlist.
    ///
    /// Device names are unique; current readback is addressed by name.
    pub fn add_device(&mut self, device: impl Stamper + 'static) -> Result<()> {
        let name = device.name().to_string();
        if self.names.contains_key(&name) {
            return Err(Error::DuplicateDevice(name));
        }
        self.num_current_vars += device.num_current_vars();
        self.names.insert(name, self.devices.len());
        self.devices.push(Box::new(device));
        Ok(())
    }

    /// Get the number of nodes (excluding ground).
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of current variables.
    pub fn num_current_vars(&self) -> usize {
        self.num_current_vars
    }

    /// Get the next available current variable index.
    pub fn next_current_index(&self) -> usize {
        self.num_current_vars
    }

    /// Assemble the MNA system from all devices.
    pub fn assemble_mna(&self) -> MnaSystem {
        let mut mna = MnaSystem::new(self.num_nodes(), self.num_current_vars);

        for device in &self.devices {
            device.stamp(&mut mna);
        }

        mna
    }

    /// Look up a device by name.
    pub fn device(&self, name: &str) -> Option<&dyn Stamper> {
        self.names.get(name).map(|&idx| self.devices[idx].as_ref())
    }

    /// Find the branch current variable index for a named device.
    ///
    /// Returns `None` if no device with that name has a branch variable.
    pub fn find_branch_index(&self, name: &str) -> Option<usize> {
        self.device(name)?.branch_index()
    }

    /// Get the devices in insertion order.
    pub fn devices(&self) -> &[BoxedStamper] {
        &self.devices
    }

    /// Get the number of devices.
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// Check whether the netlist has no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
