//! Firmware project model.
//!
//! The data layer is deliberately permissive: duplicate pins, malformed pin
//! values and undeclared libraries are all representable. Validation is the
//! job of [`checks`](crate::checks) and [`health`](crate::health), which can
//! then explain *why* a configuration is wrong instead of rejecting edits.

pub mod edit;
pub mod examples;
pub mod model;
pub mod read;
pub mod workspace;

pub use model::{Control, ControlConfig, ControlKind, ControlState, Pin, PowerSource, Project};
pub use workspace::Workspace;
