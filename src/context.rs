//! Per-run execution context.

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// A problem found while rewriting one declaration.
///
/// The declaration is left unmodified; the rest of the unit and the run
/// continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub source_path: PathBuf,
    /// Name of the declaration that was skipped.
    pub declaration: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.source_path.display(),
            self.declaration,
            self.message
        )
    }
}

/// Caller-supplied options and a sink for diagnostics, shared by every
/// unit of a run.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    options: HashMap<String, String>,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn get_option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Records a diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    /// Returns a copy of the diagnostics recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the diagnostics recorded so far.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(
            &mut *self
                .diagnostics
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}
