//! The fixed verification battery.
//!
//! - `catalog`: identities, names and categories of the six checks
//! - `eval`: pure evaluation of each check over a project snapshot
//! - `summary`: collapse a result set into a CI-friendly verdict

pub mod catalog;
pub mod eval;
pub mod summary;

pub use catalog::{BATTERY, Category, CheckId, CheckResult, CheckStatus};
pub use eval::{AnalysisInput, analyze, evaluate};
pub use summary::{Outcome, Summary, summarize};
