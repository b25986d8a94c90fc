use serde::{Deserialize, Serialize};

use crate::checks::eval::AnalysisInput;
use crate::checks::{BATTERY, CheckResult, CheckStatus, Summary, summarize};
use crate::project::{Control, PowerSource, Project};
use crate::util::LogBuffer;

pub const LOG_START: &str = "Initiating test harness sequence...";
pub const LOG_COMPLETE: &str = "Sequence complete.";
pub const LOG_CANCELLED: &str = "Sequence cancelled.";

/// Where the sequencer is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    /// Battery index currently being evaluated.
    Running { step: usize },
}

/// How the most recent run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnd {
    Complete,
    Cancelled,
}

/// Live view of a verification run, published on every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSnapshot {
    /// Run generation; 0 before the first run.
    pub run: u64,
    pub phase: Phase,
    /// Always one entry per battery check, in battery order.
    pub results: Vec<CheckResult>,
    pub log: LogBuffer,
    pub last_end: Option<RunEnd>,
}

impl VerificationSnapshot {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            run: 0,
            phase: Phase::Idle,
            results: idle_results(),
            log: LogBuffer::new(log_capacity),
            last_end: None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.results)
    }

    /// Reset for a new run. The log restarts with the run header.
    pub(crate) fn begin(&mut self, run: u64, project_name: &str) {
        self.run = run;
        self.phase = Phase::Running { step: 0 };
        self.results = idle_results();
        self.log = LogBuffer::new(self.log.capacity());
        self.log.push(LOG_START);
        self.log.push(format!("Target project: {project_name}"));
    }

    pub(crate) fn enter_step(&mut self, step: usize) {
        self.phase = Phase::Running { step };
        if let Some(r) = self.results.get_mut(step) {
            r.status = CheckStatus::Running;
        }
    }

    pub(crate) fn resolve_step(&mut self, step: usize, result: CheckResult) {
        self.log.push(result.log_line());
        if let Some(slot) = self.results.get_mut(step) {
            *slot = result;
        }
    }

    pub(crate) fn finish(&mut self) {
        self.phase = Phase::Idle;
        self.last_end = Some(RunEnd::Complete);
        self.log.push(LOG_COMPLETE);
    }

    /// Drop the remaining checks back to idle.
    pub(crate) fn cancel(&mut self) {
        self.phase = Phase::Idle;
        self.last_end = Some(RunEnd::Cancelled);
        for r in self.results.iter_mut().filter(|r| !r.status.is_terminal()) {
            *r = CheckResult::idle(r.id);
        }
        self.log.push(LOG_CANCELLED);
    }
}

fn idle_results() -> Vec<CheckResult> {
    BATTERY.into_iter().map(CheckResult::idle).collect()
}

/// Owned copy of the fields a run reads, taken once at start.
#[derive(Debug, Clone)]
pub(crate) struct RunInput {
    pub code: String,
    pub controls: Vec<Control>,
    pub libraries: Vec<String>,
    pub power_source: PowerSource,
}

impl RunInput {
    pub fn from_project(project: &Project) -> Self {
        Self {
            code: project.code.clone(),
            controls: project.controls.clone(),
            libraries: project.libraries.clone(),
            power_source: project.battery_type.clone(),
        }
    }

    pub fn as_analysis(&self) -> AnalysisInput<'_> {
        AnalysisInput {
            code: &self.code,
            controls: &self.controls,
            libraries: &self.libraries,
            power_source: &self.power_source,
        }
    }
}
