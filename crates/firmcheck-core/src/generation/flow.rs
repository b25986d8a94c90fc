//! Folding collaborator replies into the workspace.
//!
//! Every collaborator call completes before the workspace is touched, so a
//! failed call leaves the projects exactly as they were.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::GenerationError;
use crate::generation::client::{
    GenerationClient, GenerationRequest, ProjectContext, WiringRequest,
};
use crate::generation::prompt::classify_wiring;
use crate::project::{PowerSource, Project, Workspace};

/// Characters of the prompt kept as the name of a generated project.
pub const PROJECT_NAME_CHARS: usize = 30;

/// A user-visible, non-fatal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<GenerationError> for Notice {
    fn from(err: GenerationError) -> Self {
        Self::new(format!("Code generation failed: {err}"))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What a successful generation did to the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Updated { project_id: String },
    Created { project_id: String },
}

/// Outcome of a wiring resync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringSync {
    /// A Markdown table; it replaced the project's wiring.
    Table(String),
    /// Anything else; the project's wiring was kept.
    Degraded(String),
}

/// Send `prompt` to the collaborator and apply the reply.
///
/// With an active project, its code, wiring and description are replaced
/// and the returned libraries (plus `suggested_libraries`) are merged in.
/// Without one, a new project is created and made active.
pub async fn apply_generation<C: GenerationClient>(
    workspace: &mut Workspace,
    prompt: &str,
    suggested_libraries: &[String],
    client: &C,
) -> Result<Applied, Notice> {
    if prompt.trim().is_empty() {
        return Err(GenerationError::EmptyPrompt.into());
    }
    let request = GenerationRequest {
        prompt: prompt.to_string(),
        context: workspace.active().map(ProjectContext::from_project),
    };

    let reply = match client.generate(&request).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!(error = %err, "generation collaborator failed, project left unchanged");
            return Err(err.into());
        }
    };

    if let Some(project) = workspace.active_mut() {
        project.code = reply.code;
        project.wiring = reply.wiring_instructions;
        project.description = reply.explanation;
        project.merge_libraries(reply.libraries.iter().chain(suggested_libraries));
        info!(project = %project.id, libraries = project.libraries.len(), "project regenerated");
        return Ok(Applied::Updated {
            project_id: project.id.clone(),
        });
    }

    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut project = Project {
        code: reply.code,
        description: reply.explanation,
        wiring: reply.wiring_instructions,
        battery_type: PowerSource::from(PowerSource::USB_5V),
        created_at,
        ..Project::new(
            workspace.fresh_id(created_at),
            prompt.chars().take(PROJECT_NAME_CHARS).collect::<String>(),
        )
    };
    project.merge_libraries(reply.libraries.iter().chain(suggested_libraries));
    let project_id = project.id.clone();
    info!(project = %project_id, "project created from prompt");
    workspace.open(project);
    Ok(Applied::Created { project_id })
}

/// Ask the collaborator for a fresh wiring table for the active project.
///
/// Only a reply with table syntax replaces the wiring.
pub async fn resync_wiring<C: GenerationClient>(
    workspace: &mut Workspace,
    client: &C,
) -> Result<WiringSync, Notice> {
    let request = workspace
        .active()
        .map(WiringRequest::from_project)
        .ok_or_else(|| Notice::new("No active project to resync."))?;

    let reply = client.resync_wiring(&request).await.map_err(|err| {
        warn!(error = %err, "wiring resync failed, wiring left unchanged");
        Notice::new(format!("Wiring sync failed: {err}"))
    })?;

    let sync = classify_wiring(&reply);
    match (&sync, workspace.active_mut()) {
        (WiringSync::Table(table), Some(project)) => {
            project.wiring = table.clone();
            info!(project = %project.id, "wiring resynced");
        }
        (WiringSync::Degraded(_), _) => {
            warn!("wiring reply has no table, keeping existing wiring");
        }
        (WiringSync::Table(_), None) => {}
    }
    Ok(sync)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::client::GenerationResponse;
    use crate::project::examples::example;
    use std::sync::Mutex;

    /// Replays canned replies and records what it was asked.
    #[derive(Default)]
    struct Scripted {
        generate: Option<GenerationResponse>,
        wiring: Option<String>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl GenerationClient for Scripted {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            self.seen.lock().unwrap().push(request.clone());
            self.generate
                .clone()
                .ok_or_else(|| GenerationError::Request("quota exceeded".into()))
        }

        async fn resync_wiring(&self, _request: &WiringRequest) -> Result<String, GenerationError> {
            self.wiring
                .clone()
                .ok_or_else(|| GenerationError::Request("timeout".into()))
        }
    }

    fn reply(libraries: &[&str]) -> GenerationResponse {
        GenerationResponse {
            code: "void setup() {}\nvoid loop() {}".into(),
            explanation: "Regenerated.".into(),
            libraries: libraries.iter().map(|l| l.to_string()).collect(),
            wiring_instructions: "| A | B |\n|---|---|".into(),
        }
    }

    #[tokio::test]
    async fn success_updates_active_project_and_merges_libraries() {
        let mut base = example("lcd-temperature").unwrap();
        base.libraries = vec!["Wire".into(), "DHT".into()];
        let mut ws = Workspace::with_project(base);
        let client = Scripted {
            generate: Some(reply(&["Servo", "Wire"])),
            ..Default::default()
        };

        let applied = apply_generation(&mut ws, "add a servo", &["Servo".into()], &client)
            .await
            .unwrap();
        assert_eq!(
            applied,
            Applied::Updated {
                project_id: "example-lcd-temperature".into()
            }
        );

        let p = ws.active().unwrap();
        assert_eq!(p.libraries, vec!["Wire", "DHT", "Servo"]);
        assert_eq!(p.description, "Regenerated.");
        assert!(p.wiring.starts_with("| A | B |"));

        let seen = client.seen.lock().unwrap();
        assert!(seen[0].context.is_some());
    }

    #[tokio::test]
    async fn failure_leaves_project_identical() {
        let mut ws = Workspace::with_project(example("blink").unwrap());
        let before = ws.clone();

        let notice = apply_generation(&mut ws, "make it blink faster", &[], &Scripted::default())
            .await
            .unwrap_err();
        assert!(notice.message.contains("quota exceeded"));
        assert_eq!(ws, before);
    }

    #[tokio::test]
    async fn without_active_project_a_new_one_is_created() {
        let mut ws = Workspace::default();
        let client = Scripted {
            generate: Some(reply(&["Servo"])),
            ..Default::default()
        };
        let prompt = "a servo that sweeps back and forth every second";

        let Applied::Created { project_id } = apply_generation(&mut ws, prompt, &[], &client)
            .await
            .unwrap()
        else {
            panic!("expected a new project");
        };

        let p = ws.active().unwrap();
        assert_eq!(p.id, project_id);
        assert_eq!(p.name, "a servo that sweeps back and f");
        assert_eq!(p.name.chars().count(), PROJECT_NAME_CHARS);
        assert!(p.battery_type.is_usb());
        assert!(p.controls.is_empty());
        assert!(client.seen.lock().unwrap()[0].context.is_none());
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected_without_a_call() {
        let mut ws = Workspace::default();
        let client = Scripted::default();
        assert!(apply_generation(&mut ws, "   ", &[], &client).await.is_err());
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn degraded_wiring_reply_keeps_existing_wiring() {
        let mut ws = Workspace::with_project(example("traffic-light").unwrap());
        let before = ws.active().unwrap().wiring.clone();
        let client = Scripted {
            wiring: Some("Wiring sync failed.".into()),
            ..Default::default()
        };

        let sync = resync_wiring(&mut ws, &client).await.unwrap();
        assert_eq!(sync, WiringSync::Degraded("Wiring sync failed.".into()));
        assert_eq!(ws.active().unwrap().wiring, before);
    }

    #[tokio::test]
    async fn table_wiring_reply_replaces_wiring() {
        let mut ws = Workspace::with_project(example("traffic-light").unwrap());
        let table = "| Component | Pin |\n|---|---|\n| Red | 12 |";
        let client = Scripted {
            wiring: Some(format!("\n{table}\n")),
            ..Default::default()
        };

        resync_wiring(&mut ws, &client).await.unwrap();
        assert_eq!(ws.active().unwrap().wiring, table);
    }

    #[tokio::test]
    async fn resync_errors_become_notices() {
        let mut ws = Workspace::with_project(example("blink").unwrap());
        let before = ws.clone();
        let notice = resync_wiring(&mut ws, &Scripted::default()).await.unwrap_err();
        assert!(notice.message.starts_with("Wiring sync failed"));
        assert_eq!(ws, before);

        let mut empty = Workspace::default();
        assert!(resync_wiring(&mut empty, &Scripted::default()).await.is_err());
    }
}
