//! Element trait describing how a device connects into a netlist.

use crate::NodeId;

/// A circuit element that connects nodes.
pub trait Element: std::fmt::Debug {
    /// Get the element's name.
    fn name(&self) -> &str;

    /// Get the nodes this element connects to.
    fn nodes(&self) -> Vec<NodeId>;

    /// Get the number of additional current variables this element requires.
    /// Voltage sources and lossless lines need one current variable per
    /// enforced voltage difference.
    fn num_current_vars(&self) -> usize {
        0
    }

    /// Node pairs whose voltage difference this element fixes at DC.
    ///
    /// Used by netlist validation to detect loops made only of
    /// voltage-defining elements, which leave the MNA system singular.
    fn voltage_constraints(&self) -> Vec<(NodeId, NodeId)> {
        Vec::new()
    }
}
