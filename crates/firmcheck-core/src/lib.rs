//! Static analysis and simulated verification for microcontroller firmware
//! projects.
//!
//! The pipeline entry point is [`inspect`]: read a project file, run the
//! check battery and the health scorer, and assemble a [`Report`]. The timed
//! [`sequencer`] and [`simulator`] are long-lived handles for interactive
//! use and need a Tokio runtime.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

pub mod checks;
pub mod config;
pub mod error;
pub mod generation;
pub mod health;
pub mod project;
pub mod remediation;
pub mod report;
pub mod scan;
pub mod sequencer;
pub mod simulator;
pub mod util;

use checks::{AnalysisInput, analyze};
use project::Project;
use report::model::{Report, ToolInfo};

pub const TOOL_NAME: &str = "firmcheck";

/// JSON schema version of firmcheck reports.
/// Bump only when the report shape changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Read, analyze and score the project file at `path`.
pub fn inspect(path: &Path, tool: ToolInfo) -> Result<Report> {
    let file = project::read::read_project(path)
        .with_context(|| format!("loading project {}", path.display()))?;
    debug!(path = %path.display(), bytes = file.size_bytes, "project loaded");
    let (project, info) = file.into_parts();

    let checks = analyze(&AnalysisInput::from_project(&project));
    let health = health::compute_health(&project);
    Ok(Report::new(tool, info, checks, health))
}

/// Same as [`inspect`] for a project already in memory. The fingerprint is
/// taken over the project's JSON encoding.
pub fn inspect_project(project: &Project, tool: ToolInfo) -> Report {
    let checks = analyze(&AnalysisInput::from_project(project));
    let health = health::compute_health(project);
    Report::new(tool, project::read::project_info(project), checks, health)
}

/// The workbench integrity figure, 0 to 100.
pub fn compute_health_score(project: &Project) -> u8 {
    health::compute_health(project).score
}
