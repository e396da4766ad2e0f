//! The simulation orchestrator.

use std::collections::VecDeque;

use circuitlab_core::units::format_quantity;
use circuitlab_solver::{DcSolver, MnaSolver};
use serde::Serialize;

use crate::board::{Board, PlacedComponent};
use crate::builder::{build_circuit, device_name};
use crate::component::{Component, ComponentId, ComponentKind};
use crate::config::LabConfig;
use crate::discovery::{CircuitTrace, Outcome, PassLedger, TraceKind, discover_battery};
use crate::error::{Error, Result};
use crate::feedback::{LabEvent, latch_circuit, latch_short};
use crate::placement;
use crate::point::{Point, span_length};
use crate::request::{FlushOutcome, Rejected, Request};

/// Summary of one simulation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassReport {
    pub generation: u64,
    /// Batteries whose circuit was solved.
    pub solved: Vec<ComponentId>,
    /// Batteries in a loop with no resistor.
    pub shorted: Vec<ComponentId>,
    /// Batteries whose circuit the solver rejected.
    pub failed: Vec<ComponentId>,
    /// Batteries with no closed loop.
    pub open: Vec<ComponentId>,
    /// Batteries skipped because an earlier battery's loop already took them.
    pub shared: Vec<ComponentId>,
    pub active_circuits: usize,
}

/// (component, voltage, current) for each member of a solved circuit.
type Readings = Vec<(ComponentId, f64, f64)>;

/// A breadboard plus everything needed to simulate it.
///
/// Every mutating call re-runs discovery over the whole board and pushes the
/// results back to the components, unless it goes through [`submit`](Self::submit),
/// in which case [`flush`](Self::flush) runs one pass for the whole queue.
#[derive(Debug)]
pub struct CircuitLab<S = MnaSolver> {
    config: LabConfig,
    board: Board,
    solver: S,
    show_labels: bool,
    active_circuits: usize,
    events: Vec<LabEvent>,
    queue: VecDeque<Request>,
    last_report: Option<PassReport>,
}

impl CircuitLab<MnaSolver> {
    /// A lab using the dense MNA solver.
    pub fn new(config: LabConfig) -> Result<Self> {
        let solver = MnaSolver::new(config.validate_netlists);
        Self::with_solver(config, solver)
    }
}

impl Default for CircuitLab<MnaSolver> {
    fn default() -> Self {
        let config = LabConfig::default();
        let solver = MnaSolver::new(config.validate_netlists);
        Self::assemble(config, solver)
    }
}

impl<S: DcSolver> CircuitLab<S> {
    pub fn with_solver(config: LabConfig, solver: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, solver))
    }

    fn assemble(config: LabConfig, solver: S) -> Self {
        log::info!("creating {}x{} board", config.rows, config.cols);
        Self {
            board: Board::new(config.rows, config.cols),
            config,
            solver,
            show_labels: false,
            active_circuits: 0,
            events: Vec::new(),
            queue: VecDeque::new(),
            last_report: None,
        }
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Circuits solved by the last pass.
    pub fn active_circuits(&self) -> usize {
        self.active_circuits
    }

    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.board.component(id).map(PlacedComponent::component)
    }

    pub fn placed(&self, id: ComponentId) -> Option<&PlacedComponent> {
        self.board.component(id)
    }

    pub fn is_slot_free(&self, start: Point, end: Point, length: usize) -> bool {
        placement::is_slot_free(&self.board, start, end, length)
    }

    pub fn free_component_slots(&self, start: Point, length: usize) -> usize {
        placement::free_component_slots(&self.board, start, length)
    }

    pub fn block_pegs(&mut self, start: Point, end: Point, block: bool) {
        placement::block_pegs(&mut self.board, start, end, block);
    }

    /// Place a component and re-simulate.
    pub fn add_component(&mut self, component: Component, start: Point, end: Point) -> Result<ComponentId> {
        let id = self.place(component, start, end).map_err(|(_, error)| error)?;
        self.simulate_circuit();
        Ok(id)
    }

    /// Take the component with `id` whose start peg is `start` off the board
    /// and re-simulate. The returned component is inactive.
    pub fn remove_component(&mut self, id: ComponentId, start: Point) -> Result<Component> {
        let component = self.unplace(id, start)?;
        self.simulate_circuit();
        Ok(component)
    }

    /// Flip a component's closed state and re-simulate. Returns the new state.
    pub fn toggle(&mut self, id: ComponentId) -> Result<bool> {
        let closed = self.flip(id)?;
        self.simulate_circuit();
        Ok(closed)
    }

    /// Show or hide labels. Returns whether they are now shown.
    pub fn toggle_labels(&mut self) -> bool {
        self.show_labels = !self.show_labels;
        self.show_labels
    }

    pub fn labels_visible(&self) -> bool {
        self.show_labels
    }

    /// Clear the board, handing back every component it held.
    pub fn reset(&mut self) -> Vec<Component> {
        let removed = self.clear();
        self.active_circuits = 0;
        removed
    }

    /// Advance every dynamic component by one tick. Runs a pass, and returns
    /// its report, when any of them changed.
    pub fn tick(&mut self) -> Option<PassReport> {
        let active = self.active_circuits;
        let mut changed = false;
        for placed in self.board.components_mut() {
            let id = placed.id();
            let component = placed.component_mut();
            if !component.is_dynamic() {
                continue;
            }
            let was_closed = component.is_closed();
            if component.update_dynamic(active) {
                changed = true;
            }
            if component.is_closed() != was_closed {
                self.events.push(LabEvent::SwitchToggled {
                    id,
                    closed: component.is_closed(),
                });
            }
        }
        changed.then(|| self.simulate_circuit())
    }

    /// Queue a change without simulating.
    pub fn submit(&mut self, request: Request) {
        self.queue.push_back(request);
    }

    /// Requests waiting for [`flush`](Self::flush).
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply every queued request in order, then run exactly one pass.
    pub fn flush(&mut self) -> FlushOutcome {
        let mut outcome = FlushOutcome::default();
        if self.queue.is_empty() {
            return outcome;
        }

        while let Some(request) = self.queue.pop_front() {
            match request {
                Request::Place {
                    component,
                    start,
                    end,
                } => match self.place(component, start, end) {
                    Ok(id) => outcome.placed.push(id),
                    Err((component, error)) => outcome.rejected.push(Rejected {
                        request: Request::Place {
                            component,
                            start,
                            end,
                        },
                        error,
                    }),
                },
                Request::Remove { id } => {
                    let removed = match self.board.component(id) {
                        Some(placed) => self.unplace(id, placed.start()),
                        None => Err(Error::ComponentNotFound(id)),
                    };
                    match removed {
                        Ok(component) => outcome.removed.push(component),
                        Err(error) => outcome.rejected.push(Rejected { request, error }),
                    }
                }
                Request::Toggle { id } => {
                    if let Err(error) = self.flip(id) {
                        outcome.rejected.push(Rejected { request, error });
                    }
                }
                Request::Reset => outcome.removed.extend(self.clear()),
            }
        }

        outcome.report = Some(self.simulate_circuit());
        outcome
    }

    /// Feedback events since the last call.
    pub fn take_events(&mut self) -> Vec<LabEvent> {
        std::mem::take(&mut self.events)
    }

    /// The label text a renderer would show for a component, if any.
    pub fn label(&self, id: ComponentId) -> Option<String> {
        if !self.show_labels {
            return None;
        }
        let component = self.component(id)?;
        let state = component.state();
        if !state.active {
            return None;
        }
        match component.kind() {
            ComponentKind::Battery { emf } => Some(format_quantity(emf, "V")),
            _ if state.short_circuit
                || !component.is_current_significant(self.config.significant_current) =>
            {
                None
            }
            ComponentKind::Resistor { resistance } => Some(format!(
                "{} {}",
                format_quantity(resistance, "Ω"),
                format_quantity(state.current, "A")
            )),
            ComponentKind::Conductor => Some(format!(
                "{} {}",
                format_quantity(state.voltage, "V"),
                format_quantity(state.current, "A")
            )),
        }
    }

    /// Rediscover every circuit on the board, solve them and push the
    /// results to the components.
    pub fn simulate_circuit(&mut self) -> PassReport {
        let generation = self.board.next_generation();
        let mut ledger = PassLedger::new(generation);
        let mut report = PassReport {
            generation,
            ..Default::default()
        };

        let batteries: Vec<ComponentId> = self.board.batteries().collect();
        for battery in batteries {
            if ledger.is_claimed(battery) {
                report.shared.push(battery);
                continue;
            }
            let trace = discover_battery(&self.board, &mut ledger, battery);
            match trace.kind {
                TraceKind::Short => {
                    ledger.revoke(&trace.claimed);
                    self.latch(battery, false);
                    report.shorted.push(battery);
                }
                TraceKind::Solvable => match self.solve_trace(&trace) {
                    Ok(readings) => {
                        for (id, voltage, current) in readings {
                            ledger.record(id, voltage, current);
                        }
                        self.latch(battery, true);
                        report.solved.push(battery);
                    }
                    Err(err) => {
                        log::warn!("simulation of circuit {} failed: {}", battery, err);
                        for violation in err.violations() {
                            log::warn!("  {}", violation);
                        }
                        ledger.revoke(&trace.claimed);
                        self.latch(battery, false);
                        report.failed.push(battery);
                    }
                },
                TraceKind::Open => {
                    if let Some(placed) = self.board.component_mut(battery) {
                        placed.active_circuit = false;
                        placed.active_short = false;
                    }
                    report.open.push(battery);
                }
            }
        }

        for placed in self.board.components_mut() {
            let outcome = ledger.resolve(placed.id());
            apply_outcome(placed.component_mut(), outcome);
        }

        report.active_circuits = report.solved.len();
        self.active_circuits = report.active_circuits;
        log::debug!(
            "pass {}: {} solved, {} shorted, {} failed, {} open",
            generation,
            report.solved.len(),
            report.shorted.len(),
            report.failed.len(),
            report.open.len()
        );
        self.last_report = Some(report.clone());
        report
    }

    fn solve_trace(&self, trace: &CircuitTrace) -> circuitlab_solver::Result<Readings> {
        let built = build_circuit(&self.board, trace);
        log::debug!(
            "circuit {}: {} members, {} devices",
            built.netlist.title().unwrap_or_default(),
            built.probes.len(),
            built.netlist.num_devices()
        );
        let op = self.solver.solve(&built.netlist)?;

        let mut readings: Readings = built
            .probes
            .iter()
            .map(|probe| {
                let voltage = op.voltage(&probe.voltage_node).unwrap_or(0.0);
                let current = op.current(&probe.current_source).unwrap_or(0.0);
                (probe.id, voltage, current)
            })
            .collect();

        let floor = readings.iter().map(|r| r.1).fold(0.0, f64::min);
        for reading in &mut readings {
            reading.1 -= floor;
        }
        Ok(readings)
    }

    fn latch(&mut self, battery: ComponentId, solved: bool) {
        let Some(placed) = self.board.component_mut(battery) else {
            return;
        };
        if solved {
            latch_circuit(
                &mut placed.active_circuit,
                &mut placed.active_short,
                battery,
                &mut self.events,
            );
        } else {
            latch_short(
                &mut placed.active_circuit,
                &mut placed.active_short,
                battery,
                &mut self.events,
            );
        }
    }

    fn check_placement(&self, start: Point, end: Point) -> Result<usize> {
        for point in [start, end] {
            if !self.board.contains(point) {
                return Err(Error::PegNotFound(point));
            }
        }
        let length = span_length(start, end).ok_or(Error::InvalidFootprint { start, end })?;
        if !self.is_slot_free(start, end, length) {
            return Err(Error::PlacementRejected { start, end });
        }
        Ok(length)
    }

    fn place(
        &mut self,
        component: Component,
        start: Point,
        end: Point,
    ) -> std::result::Result<ComponentId, (Component, Error)> {
        if let Err(error) = self.check_placement(start, end) {
            return Err((component, error));
        }
        let id = self
            .board
            .place(component, start, end)
            .map_err(|component| (component, Error::PegNotFound(start)))?;
        placement::block_pegs(&mut self.board, start, end, true);
        if let Some(placed) = self.board.component(id) {
            log::info!(
                "placed {} {} at {} -> {}",
                placed.component().kind(),
                device_name(placed),
                start,
                end
            );
        }
        Ok(id)
    }

    fn unplace(&mut self, id: ComponentId, start: Point) -> Result<Component> {
        let peg = self.board.peg(start).ok_or(Error::PegNotFound(start))?;
        if !peg.contains(id) {
            return Err(Error::ComponentNotFound(id));
        }
        let placed = self.board.remove(id).ok_or(Error::ComponentNotFound(id))?;
        placement::block_pegs(&mut self.board, placed.start(), placed.end(), false);
        log::info!("removed component {} from {}", id, start);
        let mut component = placed.into_component();
        apply_outcome(&mut component, Outcome::Inactive);
        Ok(component)
    }

    fn flip(&mut self, id: ComponentId) -> Result<bool> {
        let placed = self
            .board
            .component_mut(id)
            .ok_or(Error::ComponentNotFound(id))?;
        let closed = placed.component_mut().toggle();
        self.events.push(LabEvent::SwitchToggled { id, closed });
        Ok(closed)
    }

    fn clear(&mut self) -> Vec<Component> {
        log::info!("resetting board with {} components", self.board.len());
        self.board
            .clear()
            .into_iter()
            .map(|placed| {
                let mut component = placed.into_component();
                apply_outcome(&mut component, Outcome::Inactive);
                component
            })
            .collect()
    }
}

/// Push a component's final state for the pass.
fn apply_outcome(component: &mut Component, outcome: Outcome) {
    match outcome {
        Outcome::Solved {
            forward,
            voltage,
            current,
        } => {
            component.set_short_circuit(false, forward);
            component.set_active(true, forward);
            component.set_voltage(voltage);
            component.set_current(current);
        }
        Outcome::Shorted { forward } => {
            component.set_active(false, forward);
            component.set_short_circuit(true, forward);
            component.set_voltage(0.0);
            component.set_current(0.0);
        }
        Outcome::Inactive => {
            component.set_active(false, false);
            component.set_short_circuit(false, false);
            component.set_voltage(0.0);
            component.set_current(0.0);
        }
    }
}

