//! Breadboard circuit discovery and simulation.
//!
//! Components are placed between pegs on a fixed lattice. After every change
//! the lab walks the board from each battery to find closed loops, tells a
//! dead short apart from a solvable circuit, builds a netlist for each
//! solvable circuit, solves its DC operating point and pushes the voltage
//! and current of every member back to the component.
//!
//! ```no_run
//! use circuitlab::{CircuitLab, Component, LabConfig, Point};
//!
//! let mut lab = CircuitLab::new(LabConfig::default())?;
//! let battery = lab.add_component(Component::battery("battery", 10.0), Point::new(0, 0), Point::new(0, 1))?;
//! lab.add_component(Component::resistor("bulb", 10e3), Point::new(0, 1), Point::new(1, 1))?;
//! lab.add_component(Component::wire("wire"), Point::new(1, 1), Point::new(1, 0))?;
//! lab.add_component(Component::wire("wire"), Point::new(1, 0), Point::new(0, 0))?;
//! assert!(lab.component(battery).unwrap().state().active);
//! # Ok::<(), circuitlab::Error>(())
//! ```

pub mod board;
pub mod builder;
pub mod component;
pub mod config;
pub mod discovery;
pub mod dynamic;
pub mod error;
pub mod feedback;
pub mod lab;
pub mod layout;
pub mod peg;
pub mod placement;
pub mod point;
pub mod request;

pub use board::{Board, PlacedComponent};
pub use builder::{BuiltCircuit, Probe, build_circuit};
pub use component::{Component, ComponentId, ComponentKind, ComponentState};
pub use config::LabConfig;
pub use discovery::{CircuitTrace, Member, Outcome, PassLedger, TraceKind, discover_battery};
pub use dynamic::{Dynamic, TimerSwitch};
pub use error::{Error, Result};
pub use feedback::LabEvent;
pub use lab::{CircuitLab, PassReport};
pub use layout::{Layout, Part, PartKind};
pub use peg::Peg;
pub use point::{Direction, Point};
pub use request::{FlushOutcome, Rejected, Request};
