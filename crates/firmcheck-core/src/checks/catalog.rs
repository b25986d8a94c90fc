use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a battery check.
///
/// Variant order is the battery order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckId {
    #[serde(rename = "R-ENTRY-01")]
    EntryPoint,
    #[serde(rename = "R-PIN-01")]
    PinCollision,
    #[serde(rename = "R-PIN-02")]
    IoInit,
    #[serde(rename = "R-PWR-01")]
    PowerBudget,
    #[serde(rename = "R-LIB-01")]
    LibraryInclusion,
    #[serde(rename = "R-SER-01")]
    SerialChannel,
}

/// The battery, in execution order.
pub const BATTERY: [CheckId; 6] = [
    CheckId::EntryPoint,
    CheckId::PinCollision,
    CheckId::IoInit,
    CheckId::PowerBudget,
    CheckId::LibraryInclusion,
    CheckId::SerialChannel,
];

impl CheckId {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckId::EntryPoint => "R-ENTRY-01",
            CheckId::PinCollision => "R-PIN-01",
            CheckId::IoInit => "R-PIN-02",
            CheckId::PowerBudget => "R-PWR-01",
            CheckId::LibraryInclusion => "R-LIB-01",
            CheckId::SerialChannel => "R-SER-01",
        }
    }

    /// Case-insensitive lookup by external id.
    pub fn parse(id: &str) -> Option<Self> {
        BATTERY
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(id.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            CheckId::EntryPoint => "Logic Entry Point",
            CheckId::PinCollision => "Pin Collision Check",
            CheckId::IoInit => "I/O Initialization",
            CheckId::PowerBudget => "Power Budget Analysis",
            CheckId::LibraryInclusion => "Library Dependency Scan",
            CheckId::SerialChannel => "Serial Communication Check",
        }
    }

    pub fn category(self) -> Category {
        match self {
            CheckId::EntryPoint | CheckId::SerialChannel => Category::Logic,
            CheckId::PinCollision | CheckId::IoInit => Category::Hardware,
            CheckId::PowerBudget => Category::Power,
            CheckId::LibraryInclusion => Category::Libraries,
        }
    }

    /// Message shown before the check has run.
    pub fn idle_message(self) -> &'static str {
        match self {
            CheckId::EntryPoint => "Checking for setup() and loop().",
            CheckId::PinCollision => "Verifying unique pin assignments.",
            CheckId::IoInit => "Verifying pinMode() configurations.",
            CheckId::PowerBudget => "Estimating peak current draw.",
            CheckId::LibraryInclusion => "Checking library inclusions.",
            CheckId::SerialChannel => "Verifying Serial.begin() presence.",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Logic,
    Hardware,
    Power,
    Libraries,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Idle,
    Running,
    Pass,
    Fail,
    Warn,
}

impl CheckStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CheckStatus::Pass | CheckStatus::Fail | CheckStatus::Warn)
    }

    /// Upper-case tag used in log lines, e.g. `FAIL`.
    pub fn tag(self) -> &'static str {
        match self {
            CheckStatus::Idle => "IDLE",
            CheckStatus::Running => "RUNNING",
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Warn => "WARN",
        }
    }
}

/// Outcome of one battery check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    pub id: CheckId,
    pub name: String,
    pub category: Category,
    pub status: CheckStatus,
    pub message: String,
    /// Numbers the verdict was derived from; `null` before evaluation.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub evidence: serde_json::Value,
}

impl CheckResult {
    /// Not-yet-run entry for the start of a verification run.
    pub fn idle(id: CheckId) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            category: id.category(),
            status: CheckStatus::Idle,
            message: id.idle_message().to_string(),
            evidence: serde_json::Value::Null,
        }
    }

    /// `[FAIL] Pin Collision Check: ...`
    pub fn log_line(&self) -> String {
        format!("[{}] {}: {}", self.status.tag(), self.name, self.message)
    }
}
