//! Feedback events for audio and other collaborators.

use serde::Serialize;

use crate::component::ComponentId;

/// Something a collaborator should react to once, not every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LabEvent {
    /// A battery's circuit became solvable.
    CircuitCompleted { battery: ComponentId },
    /// A battery became shorted, or its circuit could not be solved.
    ShortCircuit { battery: ComponentId },
    /// A component's closed state was flipped.
    SwitchToggled { id: ComponentId, closed: bool },
}

/// Cross-pass latches of a battery, updated once per pass.
pub(crate) fn latch_circuit(
    active_circuit: &mut bool,
    active_short: &mut bool,
    battery: ComponentId,
    events: &mut Vec<LabEvent>,
) {
    if !*active_circuit {
        events.push(LabEvent::CircuitCompleted { battery });
    }
    *active_circuit = true;
    *active_short = false;
}

pub(crate) fn latch_short(
    active_circuit: &mut bool,
    active_short: &mut bool,
    battery: ComponentId,
    events: &mut Vec<LabEvent>,
) {
    if !*active_short {
        events.push(LabEvent::ShortCircuit { battery });
    }
    *active_short = true;
    *active_circuit = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latches_fire_on_transition() {
        let battery = ComponentId(1);
        let (mut circuit, mut short) = (false, false);
        let mut events = Vec::new();

        latch_circuit(&mut circuit, &mut short, battery, &mut events);
        latch_circuit(&mut circuit, &mut short, battery, &mut events);
        assert_eq!(events, vec![LabEvent::CircuitCompleted { battery }]);

        latch_short(&mut circuit, &mut short, battery, &mut events);
        latch_short(&mut circuit, &mut short, battery, &mut events);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], LabEvent::ShortCircuit { battery });
        assert!(short && !circuit);
    }

    #[test]
    fn test_event_json() {
        let json = serde_json::to_string(&LabEvent::SwitchToggled {
            id: ComponentId(4),
            closed: true,
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"switch_toggled","id":4,"closed":true}"#);
    }
}
