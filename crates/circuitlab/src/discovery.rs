//! Circuit discovery: depth-first reconstruction of closed loops.
//!
//! Starting at a battery's end peg, every path through closed components is
//! followed until it either dead-ends or arrives back at the battery's start
//! peg. A loop with no resistor on it is a dead short; any other loop is
//! solvable and its components join the battery's circuit.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::board::Board;
use crate::component::ComponentId;
use crate::point::Point;

/// How a component ends a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Solved { forward: bool, voltage: f64, current: f64 },
    Shorted { forward: bool },
    Inactive,
}

/// Bookkeeping for one simulation pass, keyed by component.
#[derive(Debug, Default)]
pub struct PassLedger {
    generation: u64,
    solved: IndexMap<ComponentId, bool>,
    shorted: IndexMap<ComponentId, bool>,
    registered: HashSet<ComponentId>,
    claimed: HashSet<ComponentId>,
    readings: IndexMap<ComponentId, (f64, f64)>,
}

impl PassLedger {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            ..Default::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_solved(&self, id: ComponentId) -> bool {
        self.solved.contains_key(&id)
    }

    pub fn is_shorted(&self, id: ComponentId) -> bool {
        self.shorted.contains_key(&id)
    }

    /// Reached by a closed loop of some traversal this pass. Survives
    /// `revoke`, so a battery is traversed at most once per pass.
    pub fn is_claimed(&self, id: ComponentId) -> bool {
        self.claimed.contains(&id)
    }

    pub fn is_registered(&self, id: ComponentId) -> bool {
        self.registered.contains(&id)
    }

    /// Mark a component as part of a solvable loop. Returns true the first
    /// time the component is marked this pass.
    pub fn mark_solved(&mut self, id: ComponentId, forward: bool) -> bool {
        self.claimed.insert(id);
        self.solved.insert(id, forward).is_none()
    }

    pub fn mark_shorted(&mut self, id: ComponentId, forward: bool) {
        self.claimed.insert(id);
        self.shorted.insert(id, forward);
    }

    /// Returns true if the component was not yet registered to a circuit.
    pub fn register(&mut self, id: ComponentId) -> bool {
        self.registered.insert(id)
    }

    /// Undo solved marks (and registrations) made by one traversal. The
    /// components stay claimed for the rest of the pass.
    pub fn revoke(&mut self, ids: &[ComponentId]) {
        for id in ids {
            self.solved.shift_remove(id);
            self.registered.remove(id);
            self.readings.shift_remove(id);
        }
    }

    /// Record the solved voltage and current of a component.
    pub fn record(&mut self, id: ComponentId, voltage: f64, current: f64) {
        self.readings.insert(id, (voltage, current));
    }

    /// Final state of a component. A short outranks a solve.
    pub fn resolve(&self, id: ComponentId) -> Outcome {
        if let Some(&forward) = self.shorted.get(&id) {
            return Outcome::Shorted { forward };
        }
        match self.solved.get(&id) {
            Some(&forward) => {
                let (voltage, current) = self.readings.get(&id).copied().unwrap_or_default();
                Outcome::Solved {
                    forward,
                    voltage,
                    current,
                }
            }
            None => Outcome::Inactive,
        }
    }
}

/// A component in a circuit together with its traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub id: ComponentId,
    /// Traversed start to end.
    pub forward: bool,
}

/// What a battery's traversal found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    /// At least one loop closed without a resistor.
    Short,
    /// Every closed loop carried a resistor.
    Solvable,
    /// No loop closed.
    Open,
}

/// Result of discovering the circuit owned by one battery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitTrace {
    pub battery: ComponentId,
    /// Every component the walk entered, in first-visit order.
    pub explored: Vec<ComponentId>,
    /// Components registered to this battery's circuit, in registration order.
    pub members: Vec<Member>,
    /// Components this traversal was first to mark solved.
    pub claimed: Vec<ComponentId>,
    pub kind: TraceKind,
}

impl CircuitTrace {
    fn new(battery: ComponentId) -> Self {
        Self {
            battery,
            explored: Vec::new(),
            members: Vec::new(),
            claimed: Vec::new(),
            kind: TraceKind::Open,
        }
    }

    pub fn is_short(&self) -> bool {
        self.kind == TraceKind::Short
    }

    pub fn is_solvable(&self) -> bool {
        self.kind == TraceKind::Solvable
    }
}

/// Walk every loop through `battery`, marking the ledger as loops close.
///
/// An open battery or an id that is not a placed battery yields an empty
/// `Open` trace.
pub fn discover_battery(board: &Board, ledger: &mut PassLedger, battery: ComponentId) -> CircuitTrace {
    let mut trace = CircuitTrace::new(battery);
    let Some(root) = board.component(battery) else {
        return trace;
    };
    if !root.component().kind().is_battery() || !root.component().is_closed() {
        return trace;
    }

    let mut walker = Walker {
        board,
        ledger: &mut *ledger,
        root_start: root.start(),
        root: battery,
        path: vec![battery],
        trace: &mut trace,
    };
    walker.trace.explored.push(battery);

    let from = root.end();
    if let Some(peg) = board.peg(from) {
        for &next in peg.components() {
            if next != battery {
                walker.visit(next, from, 0);
            }
        }
    }

    trace.kind = if ledger.is_shorted(battery) {
        TraceKind::Short
    } else if ledger.is_solved(battery) {
        TraceKind::Solvable
    } else {
        TraceKind::Open
    };
    log::trace!(
        "battery {}: {:?}, explored {}, members {}",
        battery,
        trace.kind,
        trace.explored.len(),
        trace.members.len()
    );
    trace
}

struct Walker<'a> {
    board: &'a Board,
    ledger: &'a mut PassLedger,
    root: ComponentId,
    root_start: Point,
    path: Vec<ComponentId>,
    trace: &'a mut CircuitTrace,
}

impl Walker<'_> {
    fn visit(&mut self, id: ComponentId, from: Point, resistors: usize) {
        let board = self.board;
        let Some(placed) = board.component(id) else {
            return;
        };
        let component = placed.component();
        if !component.is_closed() {
            return;
        }

        self.path.push(id);
        if !self.trace.explored.contains(&id) {
            self.trace.explored.push(id);
        }
        let resistors = resistors + usize::from(component.kind().is_resistor());

        let next_point = placed.other_end(from);
        let Some(peg) = board.peg(next_point) else {
            self.path.pop();
            return;
        };

        for &next in peg.components() {
            if next == id {
                continue;
            }
            if next == self.root && next_point == self.root_start {
                if resistors == 0 {
                    self.close_short();
                    break;
                }
                self.close_solvable();
            } else if self.path.contains(&next) {
                self.path.pop();
                return;
            } else {
                self.visit(next, next_point, resistors);
            }
        }

        self.path.pop();
    }

    /// The current path with the direction each component is crossed in,
    /// walking from the root battery's start.
    fn directed_path(&self) -> Vec<Member> {
        let mut position = self.root_start;
        let mut members = Vec::with_capacity(self.path.len());
        for &id in &self.path {
            let Some(placed) = self.board.component(id) else {
                continue;
            };
            let forward = position == placed.start();
            position = if forward { placed.end() } else { placed.start() };
            members.push(Member { id, forward });
        }
        members
    }

    fn close_short(&mut self) {
        for member in self.directed_path() {
            self.ledger.mark_shorted(member.id, member.forward);
        }
    }

    fn close_solvable(&mut self) {
        for member in self.directed_path() {
            if self.ledger.register(member.id) {
                self.trace.members.push(member);
            }
            if self.ledger.mark_solved(member.id, member.forward) {
                self.trace.claimed.push(member.id);
            }
        }
    }
}
