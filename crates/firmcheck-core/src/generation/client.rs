use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::project::{Control, PowerSource, Project};

/// The parts of the active project the collaborator gets to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub code: String,
    pub wiring: String,
    pub battery_type: PowerSource,
    pub controls: Vec<Control>,
}

impl ProjectContext {
    pub fn from_project(project: &Project) -> Self {
        Self {
            code: project.code.clone(),
            wiring: project.wiring.clone(),
            battery_type: project.battery_type.clone(),
            controls: project.controls.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(rename = "naturalLanguagePrompt")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ProjectContext>,
}

/// A generation reply. All four fields are required; a reply missing any
/// of them fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub code: String,
    pub explanation: String,
    pub libraries: Vec<String>,
    /// Expected to be a Markdown table.
    pub wiring_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiringRequest {
    pub code: String,
    pub controls: Vec<Control>,
    pub battery_type: PowerSource,
}

impl WiringRequest {
    pub fn from_project(project: &Project) -> Self {
        Self {
            code: project.code.clone(),
            controls: project.controls.clone(),
            battery_type: project.battery_type.clone(),
        }
    }
}

/// The generation collaborator.
///
/// Implementations own transport, retries and timeouts. Both calls may
/// fail; callers never let a failure touch project state.
pub trait GenerationClient {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationResponse, GenerationError>> + Send;

    /// Ask for a fresh wiring table. The reply is free text: either a
    /// Markdown table or a failure message.
    fn resync_wiring(
        &self,
        request: &WiringRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}
