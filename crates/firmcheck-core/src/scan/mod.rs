//! Textual inspection of firmware source.
//!
//! Everything here is a heuristic pattern match, not semantic analysis:
//! comments and string literals are scanned like code, and macros or
//! constants hiding a pin number are invisible. Both the check battery and
//! the health scorer read their evidence from this module so the two can
//! weigh it differently without drifting on what a marker looks like.

pub mod facts;
pub mod patterns;

pub use facts::SourceFacts;
