//! Verdict derivation for a battery result set.
//!
//! Responsibilities:
//! - Count pass/fail/warn results
//! - Derive a single outcome with a transparent policy
//! - Compute CI-compatible exit codes
//!
//! Non-responsibilities:
//! - Evaluating checks (handled in `checks::eval`)
//! - Health scoring (handled in `health`, which weighs evidence differently)
//!
//! Policy:
//!
//!   - Any fail        → FAIL
//!   - Else any warn   → WARN
//!   - Else            → PASS
//!
//! Results still `idle` or `running` count towards nothing.

use serde::{Deserialize, Serialize};

use crate::checks::catalog::{CheckId, CheckResult, CheckStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Pass,
    Warn,
    Fail,
}

impl Outcome {
    /// PASS → 0, WARN → 1, FAIL → 2
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Pass => 0,
            Outcome::Warn => 1,
            Outcome::Fail => 2,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Outcome::Pass => "PASS",
            Outcome::Warn => "WARN",
            Outcome::Fail => "FAIL",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub outcome: Outcome,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    /// Failing and warning checks, sorted by id.
    pub flagged: Vec<CheckId>,
    pub exit_code: i32,
}

/// Summarize a result set.
///
/// Same input gives the same summary regardless of result order.
pub fn summarize(results: &[CheckResult]) -> Summary {
    let count = |status: CheckStatus| results.iter().filter(|r| r.status == status).count();
    let passed = count(CheckStatus::Pass);
    let failed = count(CheckStatus::Fail);
    let warned = count(CheckStatus::Warn);

    let outcome = if failed > 0 {
        Outcome::Fail
    } else if warned > 0 {
        Outcome::Warn
    } else {
        Outcome::Pass
    };

    let mut flagged: Vec<CheckId> = results
        .iter()
        .filter(|r| matches!(r.status, CheckStatus::Fail | CheckStatus::Warn))
        .map(|r| r.id)
        .collect();
    flagged.sort();

    Summary {
        outcome,
        total: results.len(),
        passed,
        failed,
        warned,
        flagged,
        exit_code: outcome.exit_code(),
    }
}
