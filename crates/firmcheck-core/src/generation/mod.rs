//! Contract with the external code-generation collaborator.
//!
//! The collaborator itself is not part of this crate. What lives here is
//! the request/response shape, the prompt text sent to it, and the rules
//! for folding a reply back into the active project without ever leaving
//! it half-updated.

pub mod client;
pub mod flow;
pub mod prompt;

pub use client::{
    GenerationClient, GenerationRequest, GenerationResponse, ProjectContext, WiringRequest,
};
pub use flow::{Applied, Notice, WiringSync, apply_generation, resync_wiring};
pub use prompt::{classify_wiring, compose_prompt, compose_wiring_prompt, parse_generation_response};
