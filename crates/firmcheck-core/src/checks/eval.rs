//! Evaluation of the battery checks.
//!
//! Every check is a pure function of `(code, controls, libraries, power
//! source)`: no I/O, no randomness, no dependence on the other checks.
//! Evaluating the same input twice yields identical results.
//!
//! The checks are textual heuristics. Library inclusion counts `#include`
//! directives instead of matching names, and I/O initialization counts
//! `pinMode` calls instead of matching pins. False positives and negatives
//! are expected and accepted.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::checks::catalog::{BATTERY, CheckId, CheckResult, CheckStatus};
use crate::project::{Control, ControlKind, Pin, PowerSource, Project};
use crate::scan::patterns;

/// Current drawn by the board itself, in milliamps.
pub const BASE_DRAW_MA: u64 = 50;

/// Flat per-control current estimate, in milliamps.
pub const PER_CONTROL_DRAW_MA: u64 = 20;

/// Budget of a USB 2.0 port, in milliamps.
pub const USB_BUDGET_MA: u64 = 500;

const PASS_MESSAGE: &str = "All checks passed.";

/// Borrowed view of the project fields the checks read.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub code: &'a str,
    pub controls: &'a [Control],
    pub libraries: &'a [String],
    pub power_source: &'a PowerSource,
}

impl<'a> AnalysisInput<'a> {
    pub fn from_project(project: &'a Project) -> Self {
        Self {
            code: &project.code,
            controls: &project.controls,
            libraries: &project.libraries,
            power_source: &project.battery_type,
        }
    }
}

/// Evaluate the whole battery in order.
pub fn analyze(input: &AnalysisInput<'_>) -> Vec<CheckResult> {
    BATTERY.into_iter().map(|id| evaluate(id, input)).collect()
}

/// Evaluate a single check.
pub fn evaluate(id: CheckId, input: &AnalysisInput<'_>) -> CheckResult {
    let (status, message, evidence) = match id {
        CheckId::EntryPoint => entry_point(input.code),
        CheckId::PinCollision => pin_collision(input.controls),
        CheckId::IoInit => io_init(input.code, input.controls),
        CheckId::PowerBudget => power_budget(input.controls, input.power_source),
        CheckId::LibraryInclusion => library_inclusion(input.code, input.libraries),
        CheckId::SerialChannel => serial_channel(input.code),
    };

    CheckResult {
        id,
        name: id.name().to_string(),
        category: id.category(),
        status,
        message,
        evidence,
    }
}

/// Heuristic peak current for `control_count` attached devices.
pub fn peak_current_ma(control_count: usize) -> u64 {
    (control_count as u64)
        .saturating_mul(PER_CONTROL_DRAW_MA)
        .saturating_add(BASE_DRAW_MA)
}

type Outcome = (CheckStatus, String, serde_json::Value);

fn pass(evidence: serde_json::Value) -> Outcome {
    (CheckStatus::Pass, PASS_MESSAGE.to_string(), evidence)
}

fn entry_point(code: &str) -> Outcome {
    let has_setup = patterns::has_setup(code);
    let has_loop = patterns::has_loop(code);
    let evidence = json!({ "has_setup": has_setup, "has_loop": has_loop });

    let missing: Vec<&str> = [("setup()", has_setup), ("loop()", has_loop)]
        .into_iter()
        .filter_map(|(marker, present)| (!present).then_some(marker))
        .collect();

    if missing.is_empty() {
        pass(evidence)
    } else {
        (
            CheckStatus::Fail,
            format!(
                "Standard Arduino entry points missing: {}.",
                missing.join(", ")
            ),
            evidence,
        )
    }
}

fn pin_collision(controls: &[Control]) -> Outcome {
    let mut seen: BTreeMap<u32, usize> = BTreeMap::new();
    let mut malformed: Vec<String> = Vec::new();
    let mut unreadable: Vec<String> = Vec::new();

    for control in controls {
        match &control.pin {
            Pin::Number(n) => *seen.entry(*n).or_default() += 1,
            Pin::Malformed(Value::Null) => {
                malformed.push(format!("{} (missing)", display_label(control)))
            }
            Pin::Malformed(raw) => malformed.push(format!("{} ({})", display_label(control), raw)),
        }
        if control.kind == ControlKind::Unknown {
            unreadable.push(format!("{} (unknown type)", display_label(control)));
        }
        if control.last_state.is_malformed() {
            unreadable.push(format!(
                "{} (lastState {})",
                display_label(control),
                control.last_state
            ));
        }
    }

    let duplicates: Vec<u32> = seen
        .iter()
        .filter_map(|(pin, count)| (*count > 1).then_some(*pin))
        .collect();
    let evidence = json!({
        "declared": controls.len(),
        "duplicate_pins": duplicates,
        "malformed": malformed,
        "unreadable": unreadable,
    });

    let mut problems = Vec::new();
    if !duplicates.is_empty() {
        let pins: Vec<String> = duplicates.iter().map(u32::to_string).collect();
        problems.push(format!(
            "Duplicate pin assignments detected in Control Panel: {}.",
            pins.join(", ")
        ));
    }
    if !malformed.is_empty() {
        problems.push(format!("Malformed pin values: {}.", malformed.join(", ")));
    }
    if !unreadable.is_empty() {
        problems.push(format!("Malformed control data: {}.", unreadable.join(", ")));
    }

    if problems.is_empty() {
        pass(evidence)
    } else {
        (CheckStatus::Fail, problems.join(" "), evidence)
    }
}

fn io_init(code: &str, controls: &[Control]) -> Outcome {
    let calls = patterns::count_pin_mode_calls(code);
    let declared = controls.len();
    let evidence = json!({ "pin_mode_calls": calls, "declared": declared });

    if calls < declared {
        (
            CheckStatus::Warn,
            format!("Only {calls}/{declared} hardware pins initialized via pinMode()."),
            evidence,
        )
    } else {
        pass(evidence)
    }
}

fn power_budget(controls: &[Control], source: &PowerSource) -> Outcome {
    let peak = peak_current_ma(controls.len());
    let evidence = json!({
        "peak_ma": peak,
        "budget_ma": USB_BUDGET_MA,
        "source": source.as_str(),
    });

    if source.is_usb() && peak > USB_BUDGET_MA {
        (
            CheckStatus::Warn,
            format!("Potential power instability (est. {peak}mA on USB source)."),
            evidence,
        )
    } else {
        pass(evidence)
    }
}

fn library_inclusion(code: &str, libraries: &[String]) -> Outcome {
    let found = patterns::count_includes(code);
    let declared = libraries.len();
    let evidence = json!({ "includes": found, "declared": declared });

    if found < declared {
        (
            CheckStatus::Fail,
            format!("Missing #include statements for declared libraries ({found}/{declared})."),
            evidence,
        )
    } else {
        pass(evidence)
    }
}

fn serial_channel(code: &str) -> Outcome {
    let present = patterns::has_serial_init(code);
    let evidence = json!({ "serial_init": present });

    if present {
        pass(evidence)
    } else {
        (
            CheckStatus::Warn,
            "Serial monitoring not initialized. Debugging will be limited.".to_string(),
            evidence,
        )
    }
}

fn display_label(control: &Control) -> &str {
    if control.label.is_empty() {
        &control.id
    } else {
        &control.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ControlKind, ControlState};
    use serde_json::json;

    fn ctrl(id: &str, pin: u32) -> Control {
        Control {
            id: id.into(),
            pin: Pin::Number(pin),
            label: format!("LED {id}"),
            kind: ControlKind::DigitalOutput,
            last_state: ControlState::Switch(false),
            config: None,
        }
    }

    fn run(id: CheckId, code: &str, controls: &[Control], libs: &[String], src: &str) -> CheckResult {
        let source = PowerSource::from(src);
        let input = AnalysisInput {
            code,
            controls,
            libraries: libs,
            power_source: &source,
        };
        evaluate(id, &input)
    }

    #[test]
    fn minimal_sketch_scenario() {
        let source = PowerSource::from("USB 5V");
        let input = AnalysisInput {
            code: "void setup(){} void loop(){}",
            controls: &[],
            libraries: &[],
            power_source: &source,
        };
        let results = analyze(&input);
        let status: Vec<_> = results.iter().map(|r| (r.id, r.status)).collect();

        assert_eq!(
            status,
            vec![
                (CheckId::EntryPoint, CheckStatus::Pass),
                (CheckId::PinCollision, CheckStatus::Pass),
                (CheckId::IoInit, CheckStatus::Pass),
                (CheckId::PowerBudget, CheckStatus::Pass),
                (CheckId::LibraryInclusion, CheckStatus::Pass),
                (CheckId::SerialChannel, CheckStatus::Warn),
            ]
        );
        assert_eq!(results[3].evidence["peak_ma"], 50);
    }

    #[test]
    fn missing_loop_fails_entry_point() {
        let r = run(CheckId::EntryPoint, "void setup() {}", &[], &[], "USB 5V");
        assert_eq!(r.status, CheckStatus::Fail);
        assert!(r.message.contains("loop()"));
        assert!(!r.message.contains("setup()"));
    }

    #[test]
    fn duplicate_pins_fail_and_are_named() {
        let controls = [ctrl("a", 2), ctrl("b", 2), ctrl("c", 4)];
        let r = run(CheckId::PinCollision, "", &controls, &[], "USB 5V");
        assert_eq!(r.status, CheckStatus::Fail);
        assert!(r.message.contains("Duplicate pin"));
        assert!(r.message.contains(": 2."));
        assert_eq!(r.evidence["duplicate_pins"], json!([2]));
    }

    #[test]
    fn distinct_pins_pass_collision() {
        let controls = [ctrl("a", 2), ctrl("b", 3)];
        let r = run(CheckId::PinCollision, "", &controls, &[], "USB 5V");
        assert_eq!(r.status, CheckStatus::Pass);
    }

    #[test]
    fn malformed_pin_is_a_hardware_fail() {
        let mut bad = ctrl("x", 0);
        bad.pin = Pin::Malformed(json!("A0"));
        let r = run(CheckId::PinCollision, "", &[bad], &[], "USB 5V");

        assert_eq!(r.status, CheckStatus::Fail);
        assert_eq!(r.category, crate::checks::Category::Hardware);
        assert!(r.message.contains("Malformed pin values: LED x (\"A0\")"));
    }

    #[test]
    fn unknown_type_and_odd_state_are_reported() {
        let mut lcd = ctrl("d", 4);
        lcd.kind = ControlKind::Unknown;
        let mut high = ctrl("h", 5);
        high.last_state = ControlState::Malformed(json!("HIGH"));
        let mut loose = ctrl("m", 0);
        loose.pin = Pin::missing();

        let r = run(CheckId::PinCollision, "", &[lcd, high, loose], &[], "USB 5V");

        assert_eq!(r.status, CheckStatus::Fail);
        assert!(r.message.contains("Malformed pin values: LED m (missing)."));
        assert!(r.message.contains(
            "Malformed control data: LED d (unknown type), LED h (lastState \"HIGH\")."
        ));
        assert_eq!(r.evidence["unreadable"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn pin_mode_count_below_controls_warns() {
        let controls = [ctrl("a", 2), ctrl("b", 3)];
        let r = run(CheckId::IoInit, "pinMode(2, OUTPUT);", &controls, &[], "USB 5V");
        assert_eq!(r.status, CheckStatus::Warn);
        assert_eq!(r.message, "Only 1/2 hardware pins initialized via pinMode().");
    }

    #[test]
    fn power_budget_boundary() {
        let twenty: Vec<_> = (0..20).map(|i| ctrl(&i.to_string(), i)).collect();
        let r = run(CheckId::PowerBudget, "", &twenty, &[], "USB 5V");
        assert_eq!(r.status, CheckStatus::Pass);
        assert_eq!(r.evidence["peak_ma"], 450);

        let twenty_five: Vec<_> = (0..25).map(|i| ctrl(&i.to_string(), i)).collect();
        let r = run(CheckId::PowerBudget, "", &twenty_five, &[], "USB 5V");
        assert_eq!(r.status, CheckStatus::Warn);
        assert!(r.message.contains("550mA"));
    }

    #[test]
    fn non_usb_source_never_warns_on_power() {
        let many: Vec<_> = (0..40).map(|i| ctrl(&i.to_string(), i)).collect();
        let r = run(CheckId::PowerBudget, "", &many, &[], "12V");
        assert_eq!(r.status, CheckStatus::Pass);
    }

    #[test]
    fn too_few_includes_fail_library_scan() {
        let libs: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let r = run(CheckId::LibraryInclusion, "#include <A.h>", &[], &libs, "USB 5V");
        assert_eq!(r.status, CheckStatus::Fail);
        assert!(r.message.contains("(1/3)"));
    }

    #[test]
    fn include_count_ignores_names() {
        let libs: Vec<String> = vec!["Servo".into()];
        let r = run(CheckId::LibraryInclusion, "#include <Wire.h>", &[], &libs, "USB 5V");
        assert_eq!(r.status, CheckStatus::Pass);
    }

    #[test]
    fn serial_presence_passes() {
        let r = run(CheckId::SerialChannel, "Serial.begin(9600);", &[], &[], "USB 5V");
        assert_eq!(r.status, CheckStatus::Pass);
    }

    #[test]
    fn analysis_is_idempotent() {
        let controls = [ctrl("a", 2), ctrl("b", 2)];
        let libs: Vec<String> = vec!["Wire".into()];
        let source = PowerSource::from("USB 5V");
        let input = AnalysisInput {
            code: "void setup(){ pinMode(2, OUTPUT); }",
            controls: &controls,
            libraries: &libs,
            power_source: &source,
        };

        let first = serde_json::to_string(&analyze(&input)).unwrap();
        let second = serde_json::to_string(&analyze(&input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn peak_current_saturates() {
        assert_eq!(peak_current_ma(0), 50);
        assert_eq!(peak_current_ma(usize::MAX), u64::MAX);
    }
}
