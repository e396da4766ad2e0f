//! Components whose electrical state changes over time.

use std::fmt;

use crate::component::Component;

/// Time-varying behaviour attached to a component.
///
/// The lab polls every placed dynamic component once per tick, passing the
/// number of circuits that were live after the last pass.
pub trait Dynamic: fmt::Debug {
    /// Advance one tick. Returns true when the board must be re-simulated.
    fn update_state(&mut self, component: &mut Component, active_circuits: usize) -> bool;
}

/// A conductor that flips between open and closed every `period` ticks.
#[derive(Debug, Clone)]
pub struct TimerSwitch {
    period: u32,
    elapsed: u32,
    /// Only count ticks while some circuit on the board is live.
    powered_only: bool,
}

impl TimerSwitch {
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            elapsed: 0,
            powered_only: false,
        }
    }

    /// Count only ticks that follow a pass with at least one live circuit.
    pub fn powered_only(mut self) -> Self {
        self.powered_only = true;
        self
    }

    pub fn period(&self) -> u32 {
        self.period
    }
}

impl Dynamic for TimerSwitch {
    fn update_state(&mut self, component: &mut Component, active_circuits: usize) -> bool {
        if self.powered_only && active_circuits == 0 && !component.is_closed() {
            return false;
        }
        self.elapsed += 1;
        if self.elapsed < self.period {
            return false;
        }
        self.elapsed = 0;
        component.toggle();
        true
    }
}
