use std::fmt::Write;

use crate::report::model::Report;

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", report.tool.name, report.tool.version);
    let _ = writeln!(
        out,
        "Project: {} ({}, {} bytes)",
        report.project.name, report.project.id, report.project.size_bytes
    );
    let _ = writeln!(out, "Checks:");
    for check in &report.checks {
        let _ = writeln!(out, "  {} {}", check.id, check.log_line());
    }
    let _ = writeln!(
        out,
        "Verdict: {} ({} passed, {} warned, {} failed)",
        report.summary.outcome, report.summary.passed, report.summary.warned, report.summary.failed
    );
    let _ = writeln!(
        out,
        "Health: {}% {}",
        report.health.score, report.health.status
    );
    if !report.remediation.is_empty() {
        let _ = writeln!(out, "Suggested fixes:");
        for fix in &report.remediation {
            let _ = writeln!(out, "  - {}", fix.prompt);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{AnalysisInput, analyze};
    use crate::health::compute_health;
    use crate::project::examples::example;
    use crate::project::read::project_info;
    use crate::report::model::ToolInfo;

    #[test]
    fn text_report_lists_checks_in_order() {
        let project = example("blink").unwrap();
        let report = Report::new(
            ToolInfo {
                name: "firmcheck".into(),
                version: "0.1.0".into(),
                commit: None,
            },
            project_info(&project),
            analyze(&AnalysisInput::from_project(&project)),
            compute_health(&project),
        );
        let text = render_text(&report);

        assert!(text.starts_with("firmcheck 0.1.0\nProject: 01. Basic Blink"));
        let entry = text.find("R-ENTRY-01 [PASS]").unwrap();
        let serial = text.find("R-SER-01 [WARN]").unwrap();
        assert!(entry < serial);
        assert!(text.contains("Verdict: WARN"));
        assert!(text.contains("Health: 90% Review Needed"));
        assert!(!text.contains("Suggested fixes"));
    }
}
