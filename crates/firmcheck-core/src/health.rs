//! Workbench health score.
//!
//! A single 0–100 integrity figure shown next to the simulator. It reads the
//! same text patterns as the check battery but weighs different evidence:
//! pins are matched one by one against literal `pinMode(<n>, ...)` calls
//! instead of comparing call counts. The two surfaces are expected to
//! disagree on some projects and are kept separate on purpose.

use serde::{Deserialize, Serialize};

use crate::project::{Control, Project};
use crate::scan::SourceFacts;

pub const ENTRY_POINT_WEIGHT: u32 = 40;
pub const SERIAL_WEIGHT: u32 = 10;
pub const PIN_CONFIG_WEIGHT: u32 = 5;

/// Below this score the general fix prompt is offered.
pub const REMEDIATION_THRESHOLD: u8 = 90;

/// One weighed piece of evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub label: String,
    pub passed: bool,
    /// Points deducted when the finding did not pass.
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub score: u8,
    pub findings: Vec<Finding>,
}

impl HealthReport {
    pub fn needs_remediation(&self) -> bool {
        self.score < REMEDIATION_THRESHOLD
    }

    pub fn status_label(&self) -> &'static str {
        if self.score == 100 {
            "System Perfect"
        } else {
            "Review Needed"
        }
    }
}

pub fn compute_health(project: &Project) -> HealthReport {
    score_source(&project.code, &project.controls)
}

/// Score a source text against its declared controls.
pub fn score_source(code: &str, controls: &[Control]) -> HealthReport {
    let facts = SourceFacts::scan(code);

    let mut findings = vec![
        Finding {
            label: "entry points setup()/loop()".to_string(),
            passed: facts.has_entry_points(),
            weight: ENTRY_POINT_WEIGHT,
        },
        Finding {
            label: "serial initialization".to_string(),
            passed: facts.has_serial_init,
            weight: SERIAL_WEIGHT,
        },
    ];
    findings.extend(controls.iter().map(|c| Finding {
        label: format!("pin {} configured", c.pin),
        passed: c.pin.number().is_some_and(|n| facts.configures_pin(n)),
        weight: PIN_CONFIG_WEIGHT,
    }));

    let deducted: u64 = findings
        .iter()
        .filter(|f| !f.passed)
        .map(|f| u64::from(f.weight))
        .sum();
    let score = 100u64.saturating_sub(deducted) as u8;

    HealthReport { score, findings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ControlKind, ControlState, Pin};
    use serde_json::json;

    fn ctrl(pin: u32) -> Control {
        Control {
            id: format!("c{pin}"),
            pin: Pin::Number(pin),
            label: String::new(),
            kind: ControlKind::DigitalOutput,
            last_state: ControlState::Switch(false),
            config: None,
        }
    }

    #[test]
    fn perfect_sketch_scores_100() {
        let code = "void setup(){ Serial.begin(9600); pinMode(13, OUTPUT); } void loop(){}";
        let report = score_source(code, &[ctrl(13)]);
        assert_eq!(report.score, 100);
        assert_eq!(report.status_label(), "System Perfect");
        assert!(!report.needs_remediation());
    }

    #[test]
    fn empty_input_stays_in_range() {
        let report = score_source("", &[]);
        assert_eq!(report.score, 50);
        assert!(report.needs_remediation());
    }

    #[test]
    fn score_clamps_at_zero() {
        let controls: Vec<_> = (0..50).map(ctrl).collect();
        let report = score_source("", &controls);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn each_unconfigured_pin_costs_five() {
        let code = "void setup(){ Serial.begin(9600); pinMode(2, OUTPUT); } void loop(){}";
        let report = score_source(code, &[ctrl(2), ctrl(3), ctrl(4)]);
        assert_eq!(report.score, 90);
    }

    #[test]
    fn malformed_pin_counts_as_unconfigured() {
        let code = "void setup(){ Serial.begin(9600); } void loop(){}";
        let mut bad = ctrl(0);
        bad.pin = Pin::Malformed(json!("A0"));
        let report = score_source(code, &[bad]);
        assert_eq!(report.score, 95);
        assert_eq!(report.findings[2].label, "pin \"A0\" configured");
    }

    #[test]
    fn named_constants_are_not_resolved() {
        let code = "const int led = 13; void setup(){ Serial.begin(9600); pinMode(led, OUTPUT); } void loop(){}";
        let report = score_source(code, &[ctrl(13)]);
        assert_eq!(report.score, 95);
    }
}
