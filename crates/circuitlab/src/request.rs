//! Queued board changes applied together in one pass.

use crate::component::{Component, ComponentId};
use crate::error::Error;
use crate::lab::PassReport;
use crate::point::Point;

/// A change to the board, queued with [`CircuitLab::submit`](crate::CircuitLab::submit).
#[derive(Debug)]
pub enum Request {
    Place {
        component: Component,
        start: Point,
        end: Point,
    },
    Remove {
        id: ComponentId,
    },
    Toggle {
        id: ComponentId,
    },
    /// Clear the whole board.
    Reset,
}

/// A request that could not be applied.
#[derive(Debug)]
pub struct Rejected {
    pub request: Request,
    pub error: Error,
}

/// What a [`CircuitLab::flush`](crate::CircuitLab::flush) did.
#[derive(Debug, Default)]
pub struct FlushOutcome {
    /// Ids of components placed, in request order.
    pub placed: Vec<ComponentId>,
    /// Components taken off the board by removals and resets.
    pub removed: Vec<Component>,
    pub rejected: Vec<Rejected>,
    /// The single pass run after applying the queue, `None` if it was empty.
    pub report: Option<PassReport>,
}
