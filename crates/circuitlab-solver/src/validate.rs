//! Netlist validation rules.
//!
//! An ill-posed netlist produces a singular MNA matrix. Checking the
//! topology first turns that into a named rule violation that callers can
//! log per subject.

use std::fmt;

use circuitlab_core::{Netlist, NodeId};

/// The rule a netlist broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The netlist has no devices.
    Empty,
    /// A loop made only of voltage-defining elements.
    VoltageLoop,
    /// A node with no DC path to ground.
    FloatingNode,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Empty => write!(f, "empty netlist"),
            Rule::VoltageLoop => write!(f, "voltage source loop"),
            Rule::FloatingNode => write!(f, "floating node"),
        }
    }
}

/// One violation of a rule by a device or node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: Rule,
    /// Device name or node label the violation is about.
    pub subject: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.subject)
    }
}

/// Disjoint sets over node numbers (ground is 0).
struct NodeSets {
    parent: Vec<usize>,
}

impl NodeSets {
    fn new(num_nodes: usize) -> Self {
        Self {
            parent: (0..=num_nodes).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Join two sets, returning false if they were already joined.
    fn union(&mut self, a: NodeId, b: NodeId) -> bool {
        let ra = self.find(a.as_u32() as usize);
        let rb = self.find(b.as_u32() as usize);
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}

/// Check a netlist against all rules, returning every violation found.
pub fn validate_netlist(netlist: &Netlist) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    if netlist.is_empty() {
        violations.push(RuleViolation {
            rule: Rule::Empty,
            subject: netlist.title().unwrap_or("netlist").to_string(),
        });
        return violations;
    }

    let num_nodes = netlist.num_nodes();

    let mut voltage_sets = NodeSets::new(num_nodes);
    for device in netlist.devices() {
        for (a, b) in device.voltage_constraints() {
            if !voltage_sets.union(a, b) {
                violations.push(RuleViolation {
                    rule: Rule::VoltageLoop,
                    subject: device.name().to_string(),
                });
                break;
            }
        }
    }

    let mut connected = NodeSets::new(num_nodes);
    for device in netlist.devices() {
        let nodes = device.nodes();
        if let Some((&first, rest)) = nodes.split_first() {
            for &node in rest {
                connected.union(first, node);
            }
        }
    }
    let ground = connected.find(0);
    for node in netlist.nodes() {
        if connected.find(node.id().as_u32() as usize) != ground {
            violations.push(RuleViolation {
                rule: Rule::FloatingNode,
                subject: node.label().to_string(),
            });
        }
    }

    violations
}
