use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::error::ProjectError;
use crate::project::model::Project;
use crate::report::model::{ProjectHash, ProjectInfo};

/// A project loaded from disk together with its file identity.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    /// Informational only.
    pub path: Option<String>,

    pub project: Project,

    pub size_bytes: u64,

    pub hash_alg: String,

    /// Hex-encoded SHA-256 of the raw file bytes.
    pub hash_hex: String,
}

impl ProjectFile {
    /// Split into the parsed project and its report-facing metadata.
    pub fn into_parts(self) -> (Project, ProjectInfo) {
        let info = ProjectInfo {
            id: self.project.id.clone(),
            name: self.project.name.clone(),
            path: self.path,
            size_bytes: self.size_bytes,
            hash: ProjectHash {
                algorithm: self.hash_alg,
                value: self.hash_hex,
            },
        };
        (self.project, info)
    }
}

/// Read a project JSON file and fingerprint its bytes.
///
/// The fingerprint depends only on file content, never on filesystem
/// metadata, so identical files always yield identical reports.
pub fn read_project(path: &Path) -> Result<ProjectFile, ProjectError> {
    let bytes = fs::read(path).map_err(|source| ProjectError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let project: Project = serde_json::from_slice(&bytes).map_err(|source| ProjectError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ProjectFile {
        path: Some(path.display().to_string()),
        size_bytes: bytes.len() as u64,
        hash_alg: "sha256".to_string(),
        hash_hex: fingerprint(&bytes),
        project,
    })
}

/// Fingerprint an in-memory project by its canonical JSON encoding.
pub fn project_info(project: &Project) -> ProjectInfo {
    let bytes = serde_json::to_vec(project).unwrap_or_default();
    ProjectInfo {
        id: project.id.clone(),
        name: project.name.clone(),
        path: None,
        size_bytes: bytes.len() as u64,
        hash: ProjectHash {
            algorithm: "sha256".to_string(),
            value: fingerprint(&bytes),
        },
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
