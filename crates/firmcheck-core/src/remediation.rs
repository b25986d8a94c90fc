//! Remediation bridge.
//!
//! Turns a failing check, or a low health score, into the natural-language
//! request handed to the generation collaborator. Pure string formatting: no
//! retries, no validation of what comes back.

use serde::{Deserialize, Serialize};

use crate::checks::{CheckId, CheckResult, CheckStatus};
use crate::health::HealthReport;

pub const GENERAL_FIX_PROMPT: &str = "Analyze my code and ensure it matches the control panel setup. \
     Make sure pinMode is set correctly for all used pins.";

/// What a fix request is about.
#[derive(Debug, Clone, Copy)]
pub enum FixTarget<'a> {
    Check(&'a CheckResult),
    General,
}

pub fn build_fix_prompt(target: FixTarget<'_>) -> String {
    match target {
        FixTarget::Check(check) => format!("Fix {}: {}", check.name, check.message),
        FixTarget::General => GENERAL_FIX_PROMPT.to_string(),
    }
}

/// A ready-to-send fix request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixPrompt {
    /// `None` for the general reconcile request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<CheckId>,
    pub prompt: String,
}

/// One prompt per failing check, in battery order, then the general prompt
/// when the health score is under the remediation threshold.
///
/// Warnings are not offered a fix.
pub fn fix_prompts(results: &[CheckResult], health: &HealthReport) -> Vec<FixPrompt> {
    let mut prompts: Vec<FixPrompt> = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .map(|r| FixPrompt {
            check: Some(r.id),
            prompt: build_fix_prompt(FixTarget::Check(r)),
        })
        .collect();

    if health.needs_remediation() {
        prompts.push(FixPrompt {
            check: None,
            prompt: build_fix_prompt(FixTarget::General),
        });
    }
    prompts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{AnalysisInput, analyze};
    use crate::health::compute_health;
    use crate::project::Project;

    fn failing(code: &str) -> (Vec<CheckResult>, HealthReport) {
        let project = Project {
            code: code.to_string(),
            ..Project::new("p1", "bench")
        };
        let results = analyze(&AnalysisInput::from_project(&project));
        (results, compute_health(&project))
    }

    #[test]
    fn check_prompt_uses_name_and_message() {
        let (results, _) = failing("void setup() {}");
        let entry = &results[0];
        assert_eq!(
            build_fix_prompt(FixTarget::Check(entry)),
            "Fix Logic Entry Point: Standard Arduino entry points missing: loop()."
        );
    }

    #[test]
    fn general_prompt_is_fixed_text() {
        assert_eq!(build_fix_prompt(FixTarget::General), GENERAL_FIX_PROMPT);
    }

    #[test]
    fn low_health_adds_general_prompt_last() {
        let (results, health) = failing("");
        assert!(health.needs_remediation());

        let prompts = fix_prompts(&results, &health);
        assert_eq!(prompts.first().and_then(|p| p.check), Some(CheckId::EntryPoint));
        let last = prompts.last().unwrap();
        assert_eq!(last.check, None);
        assert_eq!(last.prompt, GENERAL_FIX_PROMPT);
    }

    #[test]
    fn healthy_project_gets_no_prompts() {
        let (results, health) =
            failing("void setup() { Serial.begin(9600); }\nvoid loop() {}");
        assert!(!health.needs_remediation());
        assert!(fix_prompts(&results, &health).is_empty());
    }
}
