//! Integration tests for full simulation passes.

use std::cell::Cell;

use circuitlab::{
    CircuitLab, Component, ComponentId, LabConfig, LabEvent, Point, Request, TimerSwitch,
};
use circuitlab_core::Netlist;
use circuitlab_solver::{DcSolver, Error as SolverError, MnaSolver, OperatingPoint};

fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

fn new_lab() -> CircuitLab {
    CircuitLab::default()
}

/// Ids of a square loop placed with its lower-left corner at `origin`.
struct Square {
    battery: ComponentId,
    top: ComponentId,
    middle: ComponentId,
    bottom: ComponentId,
}

impl Square {
    fn all(&self) -> [ComponentId; 4] {
        [self.battery, self.top, self.middle, self.bottom]
    }
}

/// ```text
/// (x, y+1) --top-- (x+1, y+1)
///    |                 |
/// battery            middle
///    |                 |
///  (x, y) --bottom-- (x+1, y)
/// ```
fn square<S: DcSolver>(lab: &mut CircuitLab<S>, origin: Point, middle: Component) -> Square {
    let (x, y) = (origin.x, origin.y);
    let battery = lab
        .add_component(Component::battery("battery", 10.0), p(x, y), p(x, y + 1))
        .unwrap();
    let top = lab
        .add_component(Component::wire("top"), p(x, y + 1), p(x + 1, y + 1))
        .unwrap();
    let middle = lab.add_component(middle, p(x + 1, y + 1), p(x + 1, y)).unwrap();
    let bottom = lab
        .add_component(Component::wire("bottom"), p(x, y), p(x + 1, y))
        .unwrap();
    Square {
        battery,
        top,
        middle,
        bottom,
    }
}

/// Every component is exactly one of solved, shorted or inactive.
fn assert_exclusive<S: DcSolver>(lab: &CircuitLab<S>) {
    for placed in lab.board().components() {
        let state = placed.component().state();
        assert!(
            !(state.active && state.short_circuit),
            "{} is both active and shorted",
            placed.component().name()
        );
    }
}

fn is_active<S: DcSolver>(lab: &CircuitLab<S>, id: ComponentId) -> bool {
    lab.component(id).unwrap().state().active
}

fn is_short<S: DcSolver>(lab: &CircuitLab<S>, id: ComponentId) -> bool {
    lab.component(id).unwrap().state().short_circuit
}

/// Delegates to the MNA solver and counts calls.
#[derive(Debug, Default)]
struct CountingSolver {
    inner: MnaSolver,
    calls: Cell<usize>,
}

impl DcSolver for CountingSolver {
    fn solve(&self, netlist: &Netlist) -> circuitlab_solver::Result<OperatingPoint> {
        self.calls.set(self.calls.get() + 1);
        self.inner.solve(netlist)
    }
}

#[derive(Debug)]
struct FailingSolver;

impl DcSolver for FailingSolver {
    fn solve(&self, _netlist: &Netlist) -> circuitlab_solver::Result<OperatingPoint> {
        Err(SolverError::SolverError("no convergence".to_string()))
    }
}

#[test]
fn test_battery_and_resistor() {
    let mut lab = CircuitLab::new(LabConfig::default()).unwrap();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 10e3));

    let report = lab.simulate_circuit();
    assert_eq!(report.solved, vec![sq.battery]);
    assert_eq!(report.active_circuits, 1);
    assert_eq!(lab.active_circuits(), 1);

    let bulb = lab.component(sq.middle).unwrap().state();
    assert!(bulb.active);
    assert!(bulb.forward);
    assert!((bulb.current - 1e-3).abs() < 1e-9);
    assert!((bulb.voltage - 10.0).abs() < 1e-9);

    for id in sq.all() {
        let state = lab.component(id).unwrap().state();
        assert!(state.active);
        assert!((state.current - 1e-3).abs() < 1e-9, "current {}", state.current);
    }
    let battery = lab.component(sq.battery).unwrap().state();
    assert!((battery.voltage - 10.0).abs() < 1e-9);
    // The bottom wire is walked from (1, 0) back to (0, 0), against its placement.
    assert!(!lab.component(sq.bottom).unwrap().state().forward);
    assert!(lab.placed(sq.battery).unwrap().is_active_circuit());
    assert_exclusive(&lab);
}

#[test]
fn test_conductor_only_loop_is_short() {
    let solver = CountingSolver::default();
    let mut lab = CircuitLab::with_solver(LabConfig::default(), solver).unwrap();
    let sq = square(&mut lab, p(2, 2), Component::wire("middle"));

    let report = lab.simulate_circuit();
    assert_eq!(report.shorted, vec![sq.battery]);
    assert_eq!(report.active_circuits, 0);
    assert_eq!(lab.solver().calls.get(), 0);

    for id in sq.all() {
        assert!(is_short(&lab, id));
        assert!(!is_active(&lab, id));
    }
    assert!(lab.placed(sq.battery).unwrap().is_active_short());
    assert_exclusive(&lab);
}

#[test]
fn test_short_until_resistor_inserted() {
    let mut lab = new_lab();
    let sq = square(&mut lab, p(0, 0), Component::wire("middle"));

    for _ in 0..3 {
        let report = lab.simulate_circuit();
        assert_eq!(report.shorted, vec![sq.battery]);
    }

    lab.remove_component(sq.middle, p(1, 1)).unwrap();
    let bulb = lab
        .add_component(Component::resistor("bulb", 5000.0), p(1, 1), p(1, 0))
        .unwrap();

    let report = lab.last_report().unwrap();
    assert_eq!(report.solved, vec![sq.battery]);
    assert!(report.shorted.is_empty());
    assert!(is_active(&lab, bulb));
    assert!(!is_short(&lab, sq.battery));
    assert!(!lab.placed(sq.battery).unwrap().is_active_short());
}

#[test]
fn test_removal_deactivates_loop() {
    let mut lab = new_lab();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 5000.0));
    assert!(sq.all().iter().all(|&id| is_active(&lab, id)));

    let removed = lab.remove_component(sq.top, p(0, 1)).unwrap();
    assert!(!removed.state().active);

    for id in [sq.battery, sq.middle, sq.bottom] {
        let state = lab.component(id).unwrap().state();
        assert!(!state.active);
        assert!(!state.short_circuit);
        assert_eq!(state.current, 0.0);
    }
    assert_eq!(lab.last_report().unwrap().open, vec![sq.battery]);
    assert!(!lab.placed(sq.battery).unwrap().is_active_circuit());
}

#[test]
fn test_independent_circuits() {
    let mut lab = new_lab();
    let first = square(&mut lab, p(0, 0), Component::resistor("bulb", 10e3));
    let second = square(&mut lab, p(4, 4), Component::resistor("bulb", 5e3));

    let report = lab.simulate_circuit();
    assert_eq!(report.solved, vec![first.battery, second.battery]);
    assert_eq!(lab.active_circuits(), 2);

    let current = |id| lab.component(id).unwrap().state().current;
    assert!((current(first.middle) - 1e-3).abs() < 1e-9);
    assert!((current(second.middle) - 2e-3).abs() < 1e-9);

    // Shorting one leaves the other solved.
    lab.remove_component(second.middle, p(5, 5)).unwrap();
    lab.add_component(Component::wire("jumper"), p(5, 5), p(5, 4)).unwrap();
    let report = lab.last_report().unwrap();
    assert_eq!(report.solved, vec![first.battery]);
    assert_eq!(report.shorted, vec![second.battery]);
    assert!(is_active(&lab, first.middle));
    assert_exclusive(&lab);
}

#[test]
fn test_batteries_in_series_share_a_circuit() {
    let mut lab = new_lab();
    let first = lab
        .add_component(Component::battery("b1", 10.0), p(0, 0), p(0, 1))
        .unwrap();
    let second = lab
        .add_component(Component::battery("b2", 10.0), p(0, 1), p(0, 2))
        .unwrap();
    let bulb = lab
        .add_component(Component::resistor("bulb", 10e3), p(0, 2), p(1, 2))
        .unwrap();
    lab.add_component(Component::wire("w1"), p(1, 2), p(1, 1)).unwrap();
    lab.add_component(Component::wire("w2"), p(1, 1), p(1, 0)).unwrap();
    lab.add_component(Component::wire("w3"), p(1, 0), p(0, 0)).unwrap();

    let report = lab.simulate_circuit();
    assert_eq!(report.solved, vec![first]);
    assert_eq!(report.shared, vec![second]);
    assert_eq!(report.active_circuits, 1);

    let state = lab.component(bulb).unwrap().state();
    assert!((state.current - 2e-3).abs() < 1e-9);
    assert!((state.voltage - 20.0).abs() < 1e-9);
    assert!(is_active(&lab, second));
}

/// Two series batteries whose shared loop fails to solve because the
/// d1-d2-d3 detour runs parallel to w2.
#[test]
fn test_shared_battery_not_retraversed_after_failure() {
    let mut lab = CircuitLab::with_solver(LabConfig::default(), CountingSolver::default()).unwrap();
    let first = lab
        .add_component(Component::battery("b1", 10.0), p(0, 0), p(0, 1))
        .unwrap();
    let second = lab
        .add_component(Component::battery("b2", 10.0), p(0, 1), p(0, 2))
        .unwrap();
    lab.add_component(Component::resistor("bulb", 10e3), p(0, 2), p(1, 2))
        .unwrap();
    lab.add_component(Component::wire("w1"), p(1, 2), p(1, 1)).unwrap();
    lab.add_component(Component::wire("w2"), p(1, 1), p(1, 0)).unwrap();
    lab.add_component(Component::wire("w3"), p(1, 0), p(0, 0)).unwrap();
    assert_eq!(
        lab.take_events(),
        vec![LabEvent::CircuitCompleted { battery: first }]
    );

    lab.add_component(Component::wire("d1"), p(1, 1), p(2, 1)).unwrap();
    lab.add_component(Component::wire("d2"), p(2, 1), p(2, 0)).unwrap();
    lab.add_component(Component::wire("d3"), p(2, 0), p(1, 0)).unwrap();
    assert_eq!(
        lab.take_events(),
        vec![LabEvent::ShortCircuit { battery: first }]
    );

    let before = lab.solver().calls.get();
    let report = lab.simulate_circuit();
    assert_eq!(lab.solver().calls.get() - before, 1);
    assert_eq!(report.failed, vec![first]);
    assert_eq!(report.shared, vec![second]);
    assert!(report.shorted.is_empty());
    assert_eq!(report.active_circuits, 0);

    assert!(lab.placed(first).unwrap().is_active_short());
    assert!(!lab.placed(second).unwrap().is_active_short());
    assert!(!is_active(&lab, second));
    assert!(lab.take_events().is_empty());
    assert_exclusive(&lab);
}

/// ```text
/// (0,1) --bulb-- (1,1) --d3-- (2,1)
///   |              |            |
/// battery        middle        d2
///   |              |            |
/// (0,0) -bottom- (1,0) --d1-- (2,0)
/// ```
///
/// The middle wire and the d1-d2-d3 detour are parallel conductors.
#[test]
fn test_parallel_conductors_fail_validation() {
    let mut lab = new_lab();
    let battery = lab
        .add_component(Component::battery("battery", 10.0), p(0, 0), p(0, 1))
        .unwrap();
    let bulb = lab
        .add_component(Component::resistor("bulb", 5000.0), p(0, 1), p(1, 1))
        .unwrap();
    let middle = lab.add_component(Component::wire("middle"), p(1, 1), p(1, 0)).unwrap();
    let bottom = lab.add_component(Component::wire("bottom"), p(0, 0), p(1, 0)).unwrap();
    assert_eq!(lab.active_circuits(), 1);

    let detour = [
        lab.add_component(Component::wire("d1"), p(1, 0), p(2, 0)).unwrap(),
        lab.add_component(Component::wire("d2"), p(2, 0), p(2, 1)).unwrap(),
        lab.add_component(Component::wire("d3"), p(2, 1), p(1, 1)).unwrap(),
    ];
    let events = lab.take_events();
    assert_eq!(
        events,
        vec![
            LabEvent::CircuitCompleted { battery },
            LabEvent::ShortCircuit { battery },
        ]
    );

    let report = lab.simulate_circuit();
    assert_eq!(report.failed, vec![battery]);
    assert_eq!(report.active_circuits, 0);
    for id in detour.into_iter().chain([battery, bulb, middle, bottom]) {
        assert!(!is_active(&lab, id));
    }
    assert!(lab.placed(battery).unwrap().is_active_short());
    assert!(lab.take_events().is_empty());
    assert_exclusive(&lab);
}

#[test]
fn test_solver_failure_falls_back() {
    let mut lab = CircuitLab::with_solver(LabConfig::default(), FailingSolver).unwrap();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 5000.0));

    let report = lab.simulate_circuit();
    assert_eq!(report.failed, vec![sq.battery]);
    assert!(report.solved.is_empty());
    for id in sq.all() {
        assert!(!is_active(&lab, id));
        assert!(!is_short(&lab, id));
    }
    assert!(lab.placed(sq.battery).unwrap().is_active_short());
}

#[test]
fn test_switch_toggle() {
    let mut lab = new_lab();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 5000.0));
    lab.remove_component(sq.top, p(0, 1)).unwrap();
    let switch = lab
        .add_component(Component::switch("switch"), p(0, 1), p(1, 1))
        .unwrap();
    assert!(!is_active(&lab, sq.middle));

    assert!(lab.toggle(switch).unwrap());
    assert!(is_active(&lab, switch));
    assert!(is_active(&lab, sq.middle));

    assert!(!lab.toggle(switch).unwrap());
    assert!(!is_active(&lab, sq.middle));
    assert!(!is_active(&lab, switch));

    // The top wire was removed above.
    assert!(lab.toggle(sq.top).is_err());
}

#[test]
fn test_events_fire_on_transition() {
    let mut lab = new_lab();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 5000.0));
    lab.simulate_circuit();
    lab.simulate_circuit();

    let events = lab.take_events();
    assert_eq!(events, vec![LabEvent::CircuitCompleted { battery: sq.battery }]);
    assert!(lab.take_events().is_empty());

    lab.remove_component(sq.middle, p(1, 1)).unwrap();
    lab.add_component(Component::wire("jumper"), p(1, 1), p(1, 0)).unwrap();
    lab.simulate_circuit();
    assert_eq!(
        lab.take_events(),
        vec![LabEvent::ShortCircuit { battery: sq.battery }]
    );
}

#[test]
fn test_flush_runs_one_pass() {
    let mut lab = new_lab();
    let before = lab.board().generation();

    lab.submit(Request::Place {
        component: Component::battery("battery", 10.0),
        start: p(0, 0),
        end: p(0, 1),
    });
    lab.submit(Request::Place {
        component: Component::resistor("bulb", 10e3),
        start: p(0, 1),
        end: p(1, 1),
    });
    lab.submit(Request::Place {
        component: Component::wire("wire"),
        start: p(1, 1),
        end: p(1, 0),
    });
    lab.submit(Request::Place {
        component: Component::wire("wire"),
        start: p(1, 0),
        end: p(0, 0),
    });
    // Collides with the battery.
    lab.submit(Request::Place {
        component: Component::wire("stray"),
        start: p(0, 1),
        end: p(0, 0),
    });
    assert_eq!(lab.pending(), 5);
    assert_eq!(lab.board().generation(), before);

    let outcome = lab.flush();
    assert_eq!(lab.pending(), 0);
    assert_eq!(lab.board().generation(), before + 1);
    assert_eq!(outcome.placed.len(), 4);
    assert_eq!(outcome.rejected.len(), 1);
    let report = outcome.report.unwrap();
    assert_eq!(report.solved, vec![outcome.placed[0]]);

    assert!(lab.flush().report.is_none());
    assert_eq!(lab.board().generation(), before + 1);
}

#[test]
fn test_flush_remove_toggle_reset() {
    let mut lab = new_lab();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 5000.0));

    lab.submit(Request::Toggle { id: sq.top });
    lab.submit(Request::Remove { id: sq.middle });
    let outcome = lab.flush();
    assert_eq!(outcome.removed.len(), 1);
    assert!(outcome.rejected.is_empty());
    assert!(!lab.component(sq.top).unwrap().is_closed());
    assert!(!is_active(&lab, sq.battery));

    lab.submit(Request::Remove { id: sq.middle });
    lab.submit(Request::Reset);
    let outcome = lab.flush();
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.removed.len(), 3);
    assert!(lab.board().is_empty());
}

#[test]
fn test_timer_switch_tick() {
    let mut lab = new_lab();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 5000.0));
    lab.remove_component(sq.top, p(0, 1)).unwrap();
    let timer = lab
        .add_component(
            Component::switch("timer").with_dynamic(TimerSwitch::new(2)),
            p(0, 1),
            p(1, 1),
        )
        .unwrap();
    lab.take_events();

    assert!(lab.tick().is_none());
    let report = lab.tick().unwrap();
    assert_eq!(report.solved, vec![sq.battery]);
    assert!(is_active(&lab, timer));

    let events = lab.take_events();
    assert!(events.contains(&LabEvent::SwitchToggled { id: timer, closed: true }));
    assert!(events.contains(&LabEvent::CircuitCompleted { battery: sq.battery }));

    assert!(lab.tick().is_none());
    assert!(lab.tick().is_some());
    assert_eq!(lab.active_circuits(), 0);
}

#[test]
fn test_labels() {
    let mut lab = new_lab();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 10e3));
    assert_eq!(lab.label(sq.battery), None);

    assert!(lab.toggle_labels());
    assert_eq!(lab.label(sq.battery).as_deref(), Some("10V"));
    assert_eq!(lab.label(sq.middle).as_deref(), Some("10kΩ 1mA"));
    assert_eq!(lab.label(sq.top).as_deref(), Some("10V 1mA"));

    lab.remove_component(sq.top, p(0, 1)).unwrap();
    assert_eq!(lab.label(sq.battery), None);
    assert_eq!(lab.label(sq.middle), None);

    assert!(!lab.toggle_labels());
}

#[test]
fn test_reset() {
    let mut lab = new_lab();
    let sq = square(&mut lab, p(0, 0), Component::resistor("bulb", 5000.0));
    let removed = lab.reset();

    assert_eq!(removed.len(), 4);
    assert!(removed.iter().all(|c| !c.state().active));
    assert!(lab.board().is_empty());
    assert!(lab.board().pegs().all(|peg| peg.is_empty() && !peg.is_blocked()));
    assert_eq!(lab.active_circuits(), 0);
    assert!(lab.component(sq.battery).is_none());
}
