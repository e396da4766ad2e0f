//! Lab configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Board size, electrical defaults and solver switches.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Peg rows.
    pub rows: usize,
    /// Peg columns.
    pub cols: usize,
    /// Currents at or below this (A) are not shown on labels.
    pub significant_current: f64,
    /// EMF of a battery when a layout gives no value (V).
    pub battery_emf: f64,
    /// Resistance of a bulb when a layout gives no value (Ω).
    pub bulb_resistance: f64,
    /// Span of a long wire, in cells.
    pub long_wire_length: usize,
    /// Check each netlist's topology before solving it.
    pub validate_netlists: bool,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 9,
            significant_current: 1e-7,
            battery_emf: 10.0,
            bulb_resistance: 5000.0,
            long_wire_length: 2,
            validate_netlists: true,
        }
    }
}

impl LabConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::Config(format!(
                "board must have at least one peg, got {}x{}",
                self.rows, self.cols
            )));
        }
        if i32::try_from(self.rows).is_err() || i32::try_from(self.cols).is_err() {
            return Err(Error::Config("board is too large".to_string()));
        }
        if !(self.significant_current.is_finite() && self.significant_current >= 0.0) {
            return Err(Error::Config(format!(
                "significant_current must be non-negative, got {}",
                self.significant_current
            )));
        }
        if !self.battery_emf.is_finite() {
            return Err(Error::Config(format!(
                "battery_emf must be finite, got {}",
                self.battery_emf
            )));
        }
        if !(self.bulb_resistance.is_finite() && self.bulb_resistance > 0.0) {
            return Err(Error::Config(format!(
                "bulb_resistance must be positive, got {}",
                self.bulb_resistance
            )));
        }
        if self.long_wire_length < 2 {
            return Err(Error::Config(format!(
                "long_wire_length must be at least 2, got {}",
                self.long_wire_length
            )));
        }
        Ok(())
    }
}
