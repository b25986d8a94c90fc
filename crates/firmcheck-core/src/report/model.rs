use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::checks::{CheckResult, Summary, summarize};
use crate::health::{Finding, HealthReport};
use crate::remediation::{FixPrompt, fix_prompts};

/// Top-level firmcheck report.
///
/// Deterministic for identical project input: checks are kept in battery
/// order and nothing time- or environment-dependent is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub project: ProjectInfo,
    pub checks: Vec<CheckResult>,
    pub summary: Summary,
    pub health: HealthInfo,
    pub remediation: Vec<FixPrompt>,
}

impl Report {
    /// Assemble a report from analyzer and scorer outputs.
    ///
    /// Summary and remediation prompts are derived here so they can never
    /// disagree with the checks they describe.
    pub fn new(
        tool: ToolInfo,
        project: ProjectInfo,
        mut checks: Vec<CheckResult>,
        health: HealthReport,
    ) -> Self {
        checks.sort_by_key(|c| c.id);
        let summary = summarize(&checks);
        let remediation = fix_prompts(&checks, &health);

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            project,
            checks,
            summary,
            health: HealthInfo::from(health),
            remediation,
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// Identity of the analyzed project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: ProjectHash,
}

/// Cryptographic project fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectHash {
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthInfo {
    pub score: u8,
    pub status: String,
    pub needs_remediation: bool,
    pub findings: Vec<Finding>,
}

impl From<HealthReport> for HealthInfo {
    fn from(report: HealthReport) -> Self {
        Self {
            score: report.score,
            status: report.status_label().to_string(),
            needs_remediation: report.needs_remediation(),
            findings: report.findings,
        }
    }
}
