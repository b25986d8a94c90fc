//! Control-panel and library-manager edits.
//!
//! None of these operations reject a duplicate pin: collisions are reported
//! after the fact by the pin-collision check.

use crate::error::ProjectError;
use crate::project::model::{
    Control, ControlConfig, ControlKind, ControlState, Pin, PowerSource, Project, SERVO_MAX_ANGLE,
    SERVO_MIN_ANGLE,
};

/// Default tone for a freshly added buzzer.
pub const BUZZER_DEFAULT_DURATION_MS: u32 = 200;
pub const BUZZER_DEFAULT_FREQUENCY_HZ: u32 = 1000;

/// Input for [`Project::add_control`].
#[derive(Debug, Clone)]
pub struct NewControl {
    pub pin: Pin,
    pub kind: ControlKind,
    /// Falls back to a per-kind label when empty.
    pub label: Option<String>,
}

/// Partial update for [`Project::update_control`].
#[derive(Debug, Clone, Default)]
pub struct ControlUpdate {
    pub pin: Option<Pin>,
    pub label: Option<String>,
    pub kind: Option<ControlKind>,
    pub config: Option<ControlConfig>,
}

impl Project {
    /// Append a control with per-kind defaults and return its id.
    pub fn add_control(&mut self, new: NewControl) -> String {
        let id = self.next_control_id();
        let label = new
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| new.kind.default_label().to_string());
        let config = (new.kind == ControlKind::Buzzer).then_some(ControlConfig {
            duration: Some(BUZZER_DEFAULT_DURATION_MS),
            frequency: Some(BUZZER_DEFAULT_FREQUENCY_HZ),
        });

        self.controls.push(Control {
            id: id.clone(),
            pin: new.pin,
            label,
            kind: new.kind,
            last_state: new.kind.initial_state(),
            config,
        });
        id
    }

    pub fn remove_control(&mut self, id: &str) -> Result<Control, ProjectError> {
        let idx = self.control_index(id)?;
        Ok(self.controls.remove(idx))
    }

    /// Set the last known state of a control. Servo angles clamp to 0..=180.
    pub fn set_control_state(&mut self, id: &str, state: ControlState) -> Result<(), ProjectError> {
        let idx = self.control_index(id)?;
        let control = &mut self.controls[idx];
        control.last_state = match (control.kind, state) {
            (ControlKind::Servo, ControlState::Level(angle)) => {
                ControlState::Level(angle.clamp(SERVO_MIN_ANGLE, SERVO_MAX_ANGLE))
            }
            (_, state) => state,
        };
        Ok(())
    }

    pub fn update_control(&mut self, id: &str, update: ControlUpdate) -> Result<(), ProjectError> {
        let idx = self.control_index(id)?;
        let control = &mut self.controls[idx];
        if let Some(pin) = update.pin {
            control.pin = pin;
        }
        if let Some(label) = update.label {
            control.label = label;
        }
        if let Some(kind) = update.kind {
            control.kind = kind;
        }
        if let Some(config) = update.config {
            control.config = Some(config);
        }
        Ok(())
    }

    pub fn set_power_source(&mut self, source: impl Into<String>) {
        self.battery_type = PowerSource(source.into());
    }

    /// Returns `false` when the library was already declared.
    pub fn add_library(&mut self, name: &str) -> bool {
        if self.libraries.iter().any(|l| l == name) {
            return false;
        }
        self.libraries.push(name.to_string());
        true
    }

    pub fn remove_library(&mut self, name: &str) -> bool {
        let before = self.libraries.len();
        self.libraries.retain(|l| l != name);
        before != self.libraries.len()
    }

    /// Deduplicated union with the existing list, first-seen order preserved.
    pub fn merge_libraries<I, S>(&mut self, incoming: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let existing = std::mem::take(&mut self.libraries);
        let candidates = existing
            .into_iter()
            .chain(incoming.into_iter().map(|s| s.as_ref().to_string()));
        for lib in candidates {
            if !self.libraries.contains(&lib) {
                self.libraries.push(lib);
            }
        }
    }

    fn control_index(&self, id: &str) -> Result<usize, ProjectError> {
        self.controls
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ProjectError::UnknownControl(id.to_string()))
    }

    fn next_control_id(&self) -> String {
        let mut n = self.controls.len() + 1;
        loop {
            let candidate = format!("ctrl-{n}");
            if self.control(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}
