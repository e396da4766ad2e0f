//! Node representation for netlists.

use std::fmt;

/// Unique identifier for a node in a netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The ground node (node 0).
    pub const GROUND: NodeId = NodeId(0);

    /// Create a new NodeId from a raw value.
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// Get the raw node ID value.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this is the ground node.
    pub fn is_ground(self) -> bool {
        self.0 == 0
    }

    /// Row/column of this node in the MNA matrix (None for ground).
    pub fn matrix_index(self) -> Option<usize> {
        if self.is_ground() {
            None
        } else {
            Some((self.0 - 1) as usize)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A labelled node of a netlist.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    label: String,
}

impl Node {
    /// Create a new node with the given ID and label.
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the node's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check if this is the ground node.
    pub fn is_ground(&self) -> bool {
        self.id.is_ground()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_node() {
        assert!(NodeId::GROUND.is_ground());
        assert_eq!(NodeId::GROUND.as_u32(), 0);
        assert_eq!(NodeId::GROUND.to_string(), "GND");
        assert_eq!(NodeId::GROUND.matrix_index(), None);
    }

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert!(!id.is_ground());
        assert_eq!(id.as_u32(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.matrix_index(), Some(41));
    }

    #[test]
    fn test_node_label() {
        let node = Node::new(NodeId::new(1), "p2_3");
        assert_eq!(node.id().as_u32(), 1);
        assert_eq!(node.label(), "p2_3");
        assert!(!node.is_ground());
    }
}
