//! Dense modified nodal analysis system.
//!
//! Unknowns are laid out as every non-ground node voltage, then one branch
//! current per source. Ground never gets a row, so stamps take `None` for it.

use nalgebra::{DMatrix, DVector};

/// Square system `matrix * x = rhs` for one circuit.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    pub matrix: DMatrix<f64>,
    pub rhs: DVector<f64>,
    /// Rows `0..num_nodes` are node equations.
    pub num_nodes: usize,
    /// Rows after the nodes, one per source.
    pub num_branches: usize,
}

impl MnaSystem {
    pub fn new(num_nodes: usize, num_branches: usize) -> Self {
        let size = num_nodes + num_branches;
        Self {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
            num_nodes,
            num_branches,
        }
    }

    pub fn size(&self) -> usize {
        self.num_nodes + self.num_branches
    }

    /// Zero everything, keeping the dimensions.
    pub fn clear(&mut self) {
        self.matrix.fill(0.0);
        self.rhs.fill(0.0);
    }

    pub fn branch_row(&self, branch_idx: usize) -> usize {
        self.num_nodes + branch_idx
    }

    /// Add conductance `g` between `a` and `b`.
    pub fn stamp_conductance(&mut self, a: Option<usize>, b: Option<usize>, g: f64) {
        if let Some(a) = a {
            self.matrix[(a, a)] += g;
        }
        if let Some(b) = b {
            self.matrix[(b, b)] += g;
        }
        if let (Some(a), Some(b)) = (a, b) {
            self.matrix[(a, b)] -= g;
            self.matrix[(b, a)] -= g;
        }
    }

    /// Fix `V(pos) - V(neg) = voltage` using branch `branch_idx`, whose
    /// current enters at `pos`.
    pub fn stamp_voltage_source(
        &mut self,
        pos: Option<usize>,
        neg: Option<usize>,
        branch_idx: usize,
        voltage: f64,
    ) {
        let row = self.branch_row(branch_idx);
        if let Some(p) = pos {
            self.matrix[(p, row)] += 1.0;
            self.matrix[(row, p)] += 1.0;
        }
        if let Some(n) = neg {
            self.matrix[(n, row)] -= 1.0;
            self.matrix[(row, n)] -= 1.0;
        }
        self.rhs[row] = voltage;
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }
}
