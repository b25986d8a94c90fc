use std::fmt;

use serde::{Deserialize, Serialize};

/// One firmware project: source text plus its declared hardware.
///
/// Field names follow the camelCase JSON emitted by the generation
/// collaborator so project files round-trip without renaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    /// Ordered, duplicate-free when edited through the mutation API.
    #[serde(default)]
    pub libraries: Vec<String>,
    /// Free-form wiring description, usually a Markdown table.
    #[serde(default)]
    pub wiring: String,
    #[serde(default)]
    pub controls: Vec<Control>,
    #[serde(default)]
    pub battery_type: PowerSource,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: String::new(),
            description: String::new(),
            libraries: Vec::new(),
            wiring: String::new(),
            controls: Vec::new(),
            battery_type: PowerSource::default(),
            created_at: 0,
        }
    }

    pub fn control(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }
}

/// A declared hardware binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    #[serde(default)]
    pub id: String,
    #[serde(default = "Pin::missing")]
    pub pin: Pin,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: ControlKind,
    #[serde(default)]
    pub last_state: ControlState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ControlConfig>,
}

/// Board pin reference.
///
/// Anything that is not a non-negative integer is kept verbatim as
/// `Malformed` so the analyzer can report it instead of the loader
/// rejecting the whole project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pin {
    Number(u32),
    Malformed(serde_json::Value),
}

impl Pin {
    /// Stand-in for a control saved without a `pin` field.
    pub fn missing() -> Self {
        Pin::Malformed(serde_json::Value::Null)
    }

    pub fn number(&self) -> Option<u32> {
        match self {
            Pin::Number(n) => Some(*n),
            Pin::Malformed(_) => None,
        }
    }
}

impl From<u32> for Pin {
    fn from(n: u32) -> Self {
        Pin::Number(n)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pin::Number(n) => write!(f, "{n}"),
            Pin::Malformed(raw) => write!(f, "{raw}"),
        }
    }
}

/// Kind of hardware attached to a pin.
///
/// The short spellings `digital` and `input` are accepted on input for
/// projects produced by older generators. Any other tag, or none at all,
/// loads as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    #[serde(alias = "digital")]
    DigitalOutput,
    #[serde(alias = "input")]
    DigitalInput,
    Buzzer,
    Servo,
    Analog,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ControlKind {
    pub fn default_label(self) -> &'static str {
        match self {
            ControlKind::DigitalOutput => "Switch",
            ControlKind::DigitalInput => "Button",
            ControlKind::Buzzer => "Buzzer",
            ControlKind::Servo => "Servo",
            ControlKind::Analog => "Analog",
            ControlKind::Unknown => "Device",
        }
    }

    pub fn initial_state(self) -> ControlState {
        match self {
            ControlKind::Servo => ControlState::Level(SERVO_CENTER),
            _ => ControlState::Switch(false),
        }
    }
}

pub const SERVO_MIN_ANGLE: i64 = 0;
pub const SERVO_MAX_ANGLE: i64 = 180;
pub const SERVO_CENTER: i64 = 90;

/// Last known value of a control: a logic level or a servo angle.
///
/// Values of any other shape are kept verbatim as `Malformed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlState {
    Switch(bool),
    Level(i64),
    Malformed(serde_json::Value),
}

impl ControlState {
    /// Whether the pin would read HIGH. Malformed values read LOW.
    pub fn is_high(&self) -> bool {
        match self {
            ControlState::Switch(on) => *on,
            ControlState::Level(v) => *v > 0,
            ControlState::Malformed(_) => false,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ControlState::Malformed(_))
    }
}

impl Default for ControlState {
    fn default() -> Self {
        ControlState::Switch(false)
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlState::Switch(true) => f.write_str("HIGH"),
            ControlState::Switch(false) => f.write_str("LOW"),
            ControlState::Level(v) => write!(f, "{v}"),
            ControlState::Malformed(raw) => write!(f, "{raw}"),
        }
    }
}

/// Optional tone settings, used by buzzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Hertz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
}

/// Power source label, e.g. `USB 5V` or `9V`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerSource(pub String);

impl PowerSource {
    pub const USB_5V: &'static str = "USB 5V";

    /// Sources offered by the control panel. Other labels are accepted too.
    pub const KNOWN: [&'static str; 5] = ["USB 5V", "9V", "12V", "3.7V", "DC Adaptor 12V"];

    /// USB-class sources share the 500 mA port budget.
    pub fn is_usb(&self) -> bool {
        self.0.contains("USB")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PowerSource {
    fn default() -> Self {
        PowerSource(Self::USB_5V.to_string())
    }
}

impl From<&str> for PowerSource {
    fn from(s: &str) -> Self {
        PowerSource(s.to_string())
    }
}

impl fmt::Display for PowerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
