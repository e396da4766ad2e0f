//! Components and the feedback state the engine pushes to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dynamic::Dynamic;

/// Stable identity of a component placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub(crate) u32);

impl ComponentId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a component is electrically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentKind {
    /// Ideal voltage source.
    Battery { emf: f64 },
    /// Linear resistance, e.g. a bulb.
    Resistor { resistance: f64 },
    /// Zero-impedance link: wires and switches.
    Conductor,
}

impl ComponentKind {
    pub fn is_battery(&self) -> bool {
        matches!(self, ComponentKind::Battery { .. })
    }

    pub fn is_resistor(&self) -> bool {
        matches!(self, ComponentKind::Resistor { .. })
    }

    /// Prefix of the solver device names for this kind.
    pub fn device_prefix(&self) -> &'static str {
        match self {
            ComponentKind::Battery { .. } => "B",
            ComponentKind::Resistor { .. } => "R",
            ComponentKind::Conductor => "W",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Battery { .. } => write!(f, "battery"),
            ComponentKind::Resistor { .. } => write!(f, "resistor"),
            ComponentKind::Conductor => write!(f, "conductor"),
        }
    }
}

/// Feedback the engine pushes after every pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ComponentState {
    pub active: bool,
    pub short_circuit: bool,
    /// Whether the last loop traversed this component start to end.
    pub forward: bool,
    pub voltage: f64,
    pub current: f64,
}

/// A physical component, on or off the board.
#[derive(Debug)]
pub struct Component {
    name: String,
    kind: ComponentKind,
    closed: bool,
    state: ComponentState,
    dynamic: Option<Box<dyn Dynamic>>,
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            closed: true,
            state: ComponentState {
                forward: true,
                ..Default::default()
            },
            dynamic: None,
        }
    }

    pub fn battery(name: impl Into<String>, emf: f64) -> Self {
        Self::new(name, ComponentKind::Battery { emf })
    }

    pub fn resistor(name: impl Into<String>, resistance: f64) -> Self {
        Self::new(name, ComponentKind::Resistor { resistance })
    }

    pub fn wire(name: impl Into<String>) -> Self {
        Self::new(name, ComponentKind::Conductor)
    }

    /// A switch starts open.
    pub fn switch(name: impl Into<String>) -> Self {
        let mut switch = Self::new(name, ComponentKind::Conductor);
        switch.closed = false;
        switch
    }

    /// Attach time-varying behaviour polled by [`CircuitLab::tick`](crate::CircuitLab::tick).
    pub fn with_dynamic(mut self, dynamic: impl Dynamic + 'static) -> Self {
        self.dynamic = Some(Box::new(dynamic));
        self
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// An open component is skipped by circuit discovery.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Flip the closed state, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.closed = !self.closed;
        self.closed
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic.is_some()
    }

    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    pub fn set_active(&mut self, is_active: bool, is_forward: bool) {
        self.state.active = is_active;
        self.state.forward = is_forward;
    }

    pub fn set_short_circuit(&mut self, is_short: bool, is_forward: bool) {
        self.state.short_circuit = is_short;
        self.state.forward = is_forward;
    }

    pub fn set_voltage(&mut self, voltage: f64) {
        self.state.voltage = voltage;
    }

    pub fn set_current(&mut self, current: f64) {
        self.state.current = current;
    }

    /// Current above `threshold` amps.
    pub fn is_current_significant(&self, threshold: f64) -> bool {
        self.state.current > threshold
    }

    /// Poll the dynamic behaviour, if any. Returns true when the component
    /// changed in a way that needs a new pass.
    pub(crate) fn update_dynamic(&mut self, active_circuits: usize) -> bool {
        let Some(mut dynamic) = self.dynamic.take() else {
            return false;
        };
        let changed = dynamic.update_state(self, active_circuits);
        self.dynamic = Some(dynamic);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let battery = Component::battery("battery", 9.0);
        assert_eq!(battery.kind(), ComponentKind::Battery { emf: 9.0 });
        assert!(battery.is_closed());
        assert!(battery.kind().is_battery());

        let bulb = Component::resistor("bulb", 5000.0);
        assert!(bulb.kind().is_resistor());
        assert_eq!(bulb.kind().device_prefix(), "R");

        let switch = Component::switch("switch");
        assert!(!switch.is_closed());
        assert_eq!(switch.kind(), ComponentKind::Conductor);
    }

    #[test]
    fn test_toggle() {
        let mut switch = Component::switch("switch");
        assert!(switch.toggle());
        assert!(switch.is_closed());
        assert!(!switch.toggle());
    }

    #[test]
    fn test_feedback_setters() {
        let mut wire = Component::wire("wire");
        wire.set_active(true, false);
        wire.set_current(0.002);
        wire.set_voltage(4.0);

        assert!(wire.state().active);
        assert!(!wire.state().forward);
        assert!(wire.is_current_significant(1e-7));

        wire.set_short_circuit(true, true);
        assert!(wire.state().short_circuit);
        assert!(wire.state().forward);
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&ComponentKind::Battery { emf: 10.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"battery","emf":10.0}"#);
        let kind: ComponentKind = serde_json::from_str(r#"{"kind":"conductor"}"#).unwrap();
        assert_eq!(kind, ComponentKind::Conductor);
    }
}
