//! The DC solver seam.

use circuitlab_core::Netlist;

use crate::dc::{OperatingPoint, solve_dc};
use crate::error::{Error, Result};
use crate::validate::validate_netlist;

/// Solves the DC operating point of one connected circuit.
///
/// Failure is a recoverable condition: callers fall back to treating the
/// circuit as shorted.
pub trait DcSolver {
    fn solve(&self, netlist: &Netlist) -> Result<OperatingPoint>;
}

/// Dense MNA solver with optional topology validation.
#[derive(Debug, Clone)]
pub struct MnaSolver {
    /// Run [`validate_netlist`] before assembling the matrix.
    pub validate: bool,
}

impl Default for MnaSolver {
    fn default() -> Self {
        Self { validate: true }
    }
}

impl MnaSolver {
    pub fn new(validate: bool) -> Self {
        Self { validate }
    }
}

impl DcSolver for MnaSolver {
    fn solve(&self, netlist: &Netlist) -> Result<OperatingPoint> {
        if self.validate {
            let violations = validate_netlist(netlist);
            if !violations.is_empty() {
                return Err(Error::ValidationFailed { violations });
            }
        }

        let mna = netlist.assemble_mna();
        log::debug!(
            "solving {}: {} nodes, {} branches, {} devices",
            netlist.title().unwrap_or("netlist"),
            mna.num_nodes,
            mna.num_branches,
            netlist.num_devices()
        );
        let solution = solve_dc(&mna)?;
        Ok(OperatingPoint::new(netlist, solution))
    }
}

impl<S: DcSolver + ?Sized> DcSolver for &S {
    fn solve(&self, netlist: &Netlist) -> Result<OperatingPoint> {
        (**self).solve(netlist)
    }
}

impl<S: DcSolver + ?Sized> DcSolver for Box<S> {
    fn solve(&self, netlist: &Netlist) -> Result<OperatingPoint> {
        (**self).solve(netlist)
    }
}
