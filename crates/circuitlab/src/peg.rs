//! Lattice nodes where component endpoints attach.

use crate::component::ComponentId;
use crate::point::Point;

/// One lattice cell of the board.
#[derive(Debug, Clone)]
pub struct Peg {
    point: Point,
    blocked: bool,
    components: Vec<ComponentId>,
}

impl Peg {
    pub fn new(point: Point) -> Self {
        Self {
            point,
            blocked: false,
            components: Vec::new(),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    /// Whether the interior of some component's span covers this peg.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// Components with an endpoint on this peg, in attachment order.
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains(&id)
    }

    pub(crate) fn attach(&mut self, id: ComponentId) {
        if !self.contains(id) {
            self.components.push(id);
        }
    }

    /// Returns false if the component was not attached here.
    pub(crate) fn detach(&mut self, id: ComponentId) -> bool {
        match self.components.iter().position(|&c| c == id) {
            Some(index) => {
                self.components.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.blocked = false;
        self.components.clear();
    }
}
