//! Error types for the rewrite DSL.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rewrite operations.
#[derive(Error, Debug)]
pub enum RefactorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Tree-sitter parse error for {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid template `{template}`: {message}")]
    Template { template: String, message: String },

    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Repository not found at path: {0}")]
    RepoNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Manifest {path} could not be updated: {message}")]
    Manifest { path: PathBuf, message: String },
}

/// Why a template could not be applied at a given position.
///
/// These never abort a run: the declaration being rewritten is left as it
/// was and the error is recorded as a [`Diagnostic`](crate::context::Diagnostic).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("template expects {expected} argument(s), got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("placeholder {index} expects {expected}, bound fragment has type {actual}")]
    PlaceholderType {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("cannot insert {slot} into {target}")]
    IncompatibleSlot { slot: String, target: String },

    #[error("no target node under the cursor")]
    NoTarget,
}

/// A specialized Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, RefactorError>;
