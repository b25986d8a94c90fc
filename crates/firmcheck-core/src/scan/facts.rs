use serde::{Deserialize, Serialize};

use crate::scan::patterns;

/// Observations extracted from one source text.
///
/// Pure facts: no thresholds, no weights, no verdicts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFacts {
    pub has_setup: bool,
    pub has_loop: bool,
    pub pin_mode_calls: usize,
    /// Literal pin numbers passed to `pinMode`, in order of appearance.
    pub configured_pins: Vec<u32>,
    pub include_count: usize,
    pub has_serial_init: bool,
}

impl SourceFacts {
    pub fn scan(code: &str) -> Self {
        Self {
            has_setup: patterns::has_setup(code),
            has_loop: patterns::has_loop(code),
            pin_mode_calls: patterns::count_pin_mode_calls(code),
            configured_pins: patterns::configured_pins(code),
            include_count: patterns::count_includes(code),
            has_serial_init: patterns::has_serial_init(code),
        }
    }

    pub fn has_entry_points(&self) -> bool {
        self.has_setup && self.has_loop
    }

    pub fn configures_pin(&self, pin: u32) -> bool {
        self.configured_pins.contains(&pin)
    }
}
