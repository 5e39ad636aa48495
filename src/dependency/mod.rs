//! Project-level actions that run after every source unit was rewritten.

pub mod upgrade;
pub mod version;

pub use upgrade::UpgradeDependencyVersion;
pub use version::{VersionSelector, compare_versions};

use crate::error::Result;
use crate::transform::FileChange;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// An action over the project as a whole, such as a build file edit.
///
/// Actions compute their changes without writing them; the caller decides
/// whether to apply them.
pub trait SecondaryAction: Send + Sync {
    fn name(&self) -> &str;

    /// Returns a description of the action.
    fn describe(&self) -> String;

    /// Computes the file changes the action makes under `root`.
    fn run(&self, root: &Path) -> Result<Vec<FileChange>>;
}

/// What one secondary action did.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub action: String,
    #[serde(skip)]
    pub changes: Vec<FileChange>,
    /// Set when the action failed; the remaining actions still run.
    pub error: Option<String>,
}

impl ActionReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs actions in order. A failing action is reported and does not stop
/// the ones after it.
pub fn run_actions(actions: &[Box<dyn SecondaryAction>], root: &Path) -> Vec<ActionReport> {
    actions
        .iter()
        .map(|action| match action.run(root) {
            Ok(changes) => {
                info!(
                    action = %action.describe(),
                    files = changes.len(),
                    "Secondary action finished"
                );
                ActionReport {
                    action: action.describe(),
                    changes,
                    error: None,
                }
            }
            Err(e) => {
                warn!(action = %action.describe(), error = %e, "Secondary action failed");
                ActionReport {
                    action: action.describe(),
                    changes: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}
