//! Error types for the firmcheck core.
//!
//! The analyzer, scorer and prompt builders are total and never produce
//! errors. Only the edges of the engine can fail: reading project files,
//! loading configuration and the external generation collaborator.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading a project description from disk.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read project file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("project file {path} is not valid project JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no control with id `{0}`")]
    UnknownControl(String),

    #[error("unknown example project `{0}`")]
    UnknownExample(String),
}

/// Invalid engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures reported by the external generation collaborator.
///
/// These never escape as panics: the generation flow turns them into a
/// user-visible [`Notice`](crate::generation::flow::Notice) and leaves the
/// project untouched.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(String),

    #[error("collaborator returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("prompt is empty")]
    EmptyPrompt,
}
