//! Board layouts loaded from JSON.
//!
//! ```json
//! {
//!   "components": [
//!     { "kind": "battery", "start": [0, 0], "end": [0, 1] },
//!     { "kind": "bulb", "name": "lamp", "start": [0, 1], "end": [1, 1], "value": "10k" },
//!     { "kind": "switch", "start": [1, 1], "end": [1, 0], "closed": true }
//!   ]
//! }
//! ```

use std::path::Path;

use circuitlab_core::units::parse_value;
use circuitlab_solver::DcSolver;
use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::config::LabConfig;
use crate::dynamic::TimerSwitch;
use crate::error::{Error, Result};
use crate::lab::CircuitLab;
use crate::point::{Point, span_length};
use crate::request::{FlushOutcome, Request};

/// The component kinds a layout can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Battery,
    Bulb,
    Resistor,
    Wire,
    LongWire,
    Switch,
    TimerSwitch,
}

impl PartKind {
    fn default_name(self) -> &'static str {
        match self {
            PartKind::Battery => "battery",
            PartKind::Bulb => "bulb",
            PartKind::Resistor => "resistor",
            PartKind::Wire => "wire",
            PartKind::LongWire => "long_wire",
            PartKind::Switch => "switch",
            PartKind::TimerSwitch => "timer_switch",
        }
    }
}

/// One component of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub kind: PartKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub start: [i32; 2],
    pub end: [i32; 2],
    /// EMF or resistance, SI suffixes allowed (`"10k"`, `"9V"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    /// Ticks between toggles of a timer switch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
}

impl Part {
    pub fn start(&self) -> Point {
        Point::from(self.start)
    }

    pub fn end(&self) -> Point {
        Point::from(self.end)
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.default_name())
    }

    fn value_or(&self, default: f64) -> Result<f64> {
        match &self.value {
            None => Ok(default),
            Some(text) => parse_value(text).ok_or_else(|| Error::InvalidValue {
                name: self.name().to_string(),
                value: text.clone(),
            }),
        }
    }

    /// Build the component this part describes.
    pub fn to_component(&self, config: &LabConfig) -> Result<Component> {
        let length = span_length(self.start(), self.end()).ok_or(Error::InvalidFootprint {
            start: self.start(),
            end: self.end(),
        })?;
        let expected = match self.kind {
            PartKind::LongWire => config.long_wire_length,
            _ => 1,
        };
        if length != expected {
            return Err(Error::InvalidValue {
                name: self.name().to_string(),
                value: format!("span of {} cells, expected {}", length, expected),
            });
        }

        let name = self.name();
        let component = match self.kind {
            PartKind::Battery => Component::battery(name, self.value_or(config.battery_emf)?),
            PartKind::Bulb | PartKind::Resistor => {
                Component::resistor(name, self.value_or(config.bulb_resistance)?)
            }
            PartKind::Wire | PartKind::LongWire => Component::wire(name),
            PartKind::Switch => Component::switch(name),
            PartKind::TimerSwitch => {
                Component::switch(name).with_dynamic(TimerSwitch::new(self.period.unwrap_or(1)))
            }
        };
        Ok(match self.closed {
            Some(closed) => component.with_closed(closed),
            None => component,
        })
    }
}

/// A list of components to place on a fresh board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub components: Vec<Part>,
}

impl Layout {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Queue every part on the lab and run one pass.
    ///
    /// Fails before touching the lab if any part is malformed. Parts that
    /// are well formed but collide on the board come back as rejections.
    pub fn apply<S: DcSolver>(&self, lab: &mut CircuitLab<S>) -> Result<FlushOutcome> {
        let mut requests = Vec::with_capacity(self.components.len());
        for part in &self.components {
            requests.push(Request::Place {
                component: part.to_component(lab.config())?,
                start: part.start(),
                end: part.end(),
            });
        }
        for request in requests {
            lab.submit(request);
        }
        Ok(lab.flush())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    #[test]
    fn test_parse_layout() {
        let layout = Layout::from_json(
            r#"{ "components": [
                { "kind": "battery", "start": [0, 0], "end": [0, 1], "value": "9V" },
                { "kind": "bulb", "name": "lamp", "start": [0, 1], "end": [1, 1], "value": "10k" },
                { "kind": "long_wire", "start": [1, 1], "end": [1, 3] },
                { "kind": "switch", "start": [0, 0], "end": [1, 0], "closed": true }
            ] }"#,
        )
        .unwrap();
        let config = LabConfig::default();

        let battery = layout.components[0].to_component(&config).unwrap();
        assert_eq!(battery.kind(), ComponentKind::Battery { emf: 9.0 });

        let lamp = layout.components[1].to_component(&config).unwrap();
        assert_eq!(lamp.name(), "lamp");
        assert_eq!(lamp.kind(), ComponentKind::Resistor { resistance: 10e3 });

        assert!(layout.components[2].to_component(&config).is_ok());
        assert!(layout.components[3].to_component(&config).unwrap().is_closed());
    }

    #[test]
    fn test_defaults_from_config() {
        let part = Part {
            kind: PartKind::Bulb,
            name: None,
            start: [0, 0],
            end: [0, 1],
            value: None,
            closed: None,
            period: None,
        };
        let component = part.to_component(&LabConfig::default()).unwrap();
        assert_eq!(component.name(), "bulb");
        assert_eq!(component.kind(), ComponentKind::Resistor { resistance: 5000.0 });
    }

    #[test]
    fn test_bad_parts() {
        let config = LabConfig::default();
        let part = |kind, end: [i32; 2], value: Option<&str>| Part {
            kind,
            name: None,
            start: [0, 0],
            end,
            value: value.map(str::to_string),
            closed: None,
            period: None,
        };

        assert!(matches!(
            part(PartKind::Wire, [1, 1], None).to_component(&config),
            Err(Error::InvalidFootprint { .. })
        ));
        assert!(matches!(
            part(PartKind::LongWire, [0, 1], None).to_component(&config),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            part(PartKind::Battery, [0, 1], Some("lots")).to_component(&config),
            Err(Error::InvalidValue { .. })
        ));
    }
}
