//! The peg lattice and the registry of placed components.

use indexmap::IndexMap;

use crate::component::{Component, ComponentId};
use crate::peg::Peg;
use crate::point::{Direction, Point, footprint, span_length};

/// A component on the board between two pegs.
#[derive(Debug)]
pub struct PlacedComponent {
    id: ComponentId,
    start: Point,
    end: Point,
    component: Component,
    /// Battery latch: the last pass solved this battery's circuit.
    pub(crate) active_circuit: bool,
    /// Battery latch: the last pass found this battery shorted.
    pub(crate) active_short: bool,
}

impl PlacedComponent {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.component
    }

    /// The endpoint opposite `from`. Anything other than `end` maps to `end`.
    pub fn other_end(&self, from: Point) -> Point {
        if from == self.end {
            self.start
        } else {
            self.end
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        Direction::of_span(self.start, self.end)
    }

    pub fn length(&self) -> usize {
        span_length(self.start, self.end).unwrap_or(0)
    }

    /// Every cell the component covers, endpoints included.
    pub fn footprint(&self) -> Vec<Point> {
        footprint(self.start, self.end).unwrap_or_default()
    }

    pub fn is_active_circuit(&self) -> bool {
        self.active_circuit
    }

    pub fn is_active_short(&self) -> bool {
        self.active_short
    }

    pub(crate) fn into_component(self) -> Component {
        self.component
    }
}

/// Fixed-size peg lattice plus the components placed on it.
#[derive(Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Row-major, `rows * cols` entries.
    pegs: Vec<Peg>,
    components: IndexMap<ComponentId, PlacedComponent>,
    generation: u64,
    next_id: u32,
}

impl Board {
    /// Create an empty board with one peg per lattice cell.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut pegs = Vec::with_capacity(rows * cols);
        for y in 0..rows {
            for x in 0..cols {
                pegs.push(Peg::new(Point::new(x as i32, y as i32)));
            }
        }
        Self {
            rows,
            cols,
            pegs,
            components: IndexMap::new(),
            generation: 0,
            next_id: 1,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, point: Point) -> bool {
        self.index_of(point).is_some()
    }

    fn index_of(&self, point: Point) -> Option<usize> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.cols && y < self.rows).then_some(y * self.cols + x)
    }

    pub fn peg(&self, point: Point) -> Option<&Peg> {
        self.index_of(point).map(|i| &self.pegs[i])
    }

    pub(crate) fn peg_mut(&mut self, point: Point) -> Option<&mut Peg> {
        self.index_of(point).map(move |i| &mut self.pegs[i])
    }

    pub fn pegs(&self) -> impl Iterator<Item = &Peg> {
        self.pegs.iter()
    }

    /// Pass token, incremented once per simulation pass.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Register a component and attach it to the pegs at both endpoints.
    ///
    /// No placement rules are checked here. The component is handed back
    /// when either endpoint is off the board.
    pub(crate) fn place(
        &mut self,
        component: Component,
        start: Point,
        end: Point,
    ) -> Result<ComponentId, Component> {
        if !self.contains(start) || !self.contains(end) {
            return Err(component);
        }
        let id = ComponentId(self.next_id);
        self.next_id += 1;

        for point in [start, end] {
            if let Some(peg) = self.peg_mut(point) {
                peg.attach(id);
            }
        }
        self.components.insert(
            id,
            PlacedComponent {
                id,
                start,
                end,
                component,
                active_circuit: false,
                active_short: false,
            },
        );
        Ok(id)
    }

    /// Detach a component from both pegs and drop it from the registry.
    pub(crate) fn remove(&mut self, id: ComponentId) -> Option<PlacedComponent> {
        let placed = self.components.shift_remove(&id)?;
        for point in [placed.start, placed.end] {
            let detached = self.peg_mut(point).is_some_and(|peg| peg.detach(id));
            if !detached {
                log::warn!("component {} was not attached to peg {}", id, point);
            }
        }
        Some(placed)
    }

    /// Remove every component and unblock every peg.
    pub(crate) fn clear(&mut self) -> Vec<PlacedComponent> {
        for peg in &mut self.pegs {
            peg.clear();
        }
        self.components.drain(..).map(|(_, placed)| placed).collect()
    }

    pub fn component(&self, id: ComponentId) -> Option<&PlacedComponent> {
        self.components.get(&id)
    }

    pub(crate) fn component_mut(&mut self, id: ComponentId) -> Option<&mut PlacedComponent> {
        self.components.get_mut(&id)
    }

    /// Placed components in registration order.
    pub fn components(&self) -> impl Iterator<Item = &PlacedComponent> {
        self.components.values()
    }

    pub(crate) fn components_mut(&mut self) -> impl Iterator<Item = &mut PlacedComponent> {
        self.components.values_mut()
    }

    /// Batteries in registration order.
    pub fn batteries(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components
            .values()
            .filter(|placed| placed.component.kind().is_battery())
            .map(|placed| placed.id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
