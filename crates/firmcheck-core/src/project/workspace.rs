//! The set of open projects and which one is active.

use serde::{Deserialize, Serialize};

use crate::project::model::Project;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Newest first.
    pub projects: Vec<Project>,
    pub active_id: Option<String>,
}

impl Workspace {
    pub fn with_project(project: Project) -> Self {
        Self {
            active_id: Some(project.id.clone()),
            projects: vec![project],
        }
    }

    pub fn active(&self) -> Option<&Project> {
        let id = self.active_id.as_deref()?;
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn active_mut(&mut self) -> Option<&mut Project> {
        let id = self.active_id.as_deref()?;
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Insert at the front and make it active.
    pub fn open(&mut self, project: Project) {
        self.active_id = Some(project.id.clone());
        self.projects.insert(0, project);
    }

    /// An id derived from `created_at` that no open project uses yet.
    pub fn fresh_id(&self, created_at: u64) -> String {
        let mut n = created_at;
        loop {
            let candidate = n.to_string();
            if self.projects.iter().all(|p| p.id != candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_puts_project_first_and_activates_it() {
        let mut ws = Workspace::with_project(Project::new("a", "first"));
        ws.open(Project::new("b", "second"));

        assert_eq!(ws.projects[0].id, "b");
        assert_eq!(ws.active().map(|p| p.name.as_str()), Some("second"));
    }

    #[test]
    fn dangling_active_id_has_no_active_project() {
        let ws = Workspace {
            projects: vec![Project::new("a", "first")],
            active_id: Some("gone".into()),
        };
        assert!(ws.active().is_none());
    }

    #[test]
    fn fresh_id_skips_taken_ids() {
        let ws = Workspace::with_project(Project::new("1700", "taken"));
        assert_eq!(ws.fresh_id(1700), "1701");
        assert_eq!(ws.fresh_id(42), "42");
    }
}
