use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::project::{ControlState, Project};
use crate::simulator::waveform;
use crate::util::LogBuffer;

pub const LOG_BOOT: &str = "Booting virtual MCU...";
pub const LOG_SETUP_DONE: &str = "[MCU] setup() finished.";
pub const LOG_ENTER_LOOP: &str = "[MCU] Entering loop()...";
pub const LOG_HALTED: &str = "Simulation halted.";

/// Live view of the simulated board.
///
/// `pin_states` is a fork of the project's control states taken at start;
/// ticks mutate this copy, never the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Start generation; 0 before the first start.
    pub session: u64,
    pub running: bool,
    pub booted: bool,
    pub tick: u64,
    /// Waveform phase, wraps at the configured modulus.
    pub phase: u32,
    pub pin_states: BTreeMap<u32, ControlState>,
    pub log: LogBuffer,
}

impl SimulationSnapshot {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            session: 0,
            running: false,
            booted: false,
            tick: 0,
            phase: 0,
            pin_states: BTreeMap::new(),
            log: LogBuffer::new(log_capacity),
        }
    }

    /// Whether `pin` is currently HIGH. Unknown pins read LOW.
    pub fn is_high(&self, pin: u32) -> bool {
        self.running && self.pin_states.get(&pin).is_some_and(|s| s.is_high())
    }

    pub fn waveform(&self) -> Vec<(f64, f64)> {
        waveform::waveform(self.phase)
    }

    pub fn cpu_load_percent(&self) -> f64 {
        if self.running {
            waveform::cpu_load_percent(self.phase)
        } else {
            0.0
        }
    }

    /// Seed pin states from the project and write the boot banner.
    pub(crate) fn boot(&mut self, session: u64, project: &Project) {
        self.session = session;
        self.running = true;
        self.booted = false;
        self.tick = 0;
        self.phase = 0;
        // Later controls win on a shared pin.
        self.pin_states = project
            .controls
            .iter()
            .filter_map(|c| Some((c.pin.number()?, c.last_state.clone())))
            .collect();
        self.log = LogBuffer::new(self.log.capacity());
        self.log.push(LOG_BOOT);
        self.log.push(format!("Loading firmware: {}", project.id));
    }

    pub(crate) fn setup_finished(&mut self) {
        self.booted = true;
        self.log.push(LOG_SETUP_DONE);
        self.log.push(LOG_ENTER_LOOP);
    }

    pub(crate) fn advance(&mut self, phase_modulus: u32, flip: Option<(u32, bool)>) {
        self.tick += 1;
        self.phase = (self.phase + 1) % phase_modulus.max(1);
        if let Some((pin, level)) = flip {
            self.pin_states.insert(pin, ControlState::Switch(level));
        }
    }

    pub(crate) fn halt(&mut self) {
        self.running = false;
        self.log.push(LOG_HALTED);
    }
}
