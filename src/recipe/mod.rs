//! Recipes: a tree visitor plus the project-level actions that go with it.

pub mod config;
pub mod rule_lifecycle;

pub use config::{DependencyConfig, RuleMigrationConfig};
pub use rule_lifecycle::{RuleToLifecycleMethod, update_mock_web_server};

use crate::dependency::SecondaryAction;
use crate::error::Result;
use crate::tree::TreeVisitor;

/// A named, self-contained rewrite.
///
/// # Example
///
/// ```rust
/// use rewrite_dsl::recipe::{Recipe, update_mock_web_server};
///
/// let recipe = update_mock_web_server()?;
/// assert_eq!(recipe.name(), "rule-to-lifecycle-method");
/// assert_eq!(recipe.recipe_list().len(), 1);
/// # Ok::<(), rewrite_dsl::error::RefactorError>(())
/// ```
pub trait Recipe: Send + Sync {
    /// Unique name for this recipe.
    fn name(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Human-readable description of what this recipe does.
    fn description(&self) -> &str;

    /// A fresh visitor for one compilation unit.
    fn visitor(&self) -> Box<dyn TreeVisitor>;

    /// Actions run once per project after every unit was visited, whether
    /// or not any unit changed.
    fn recipe_list(&self) -> Vec<Box<dyn SecondaryAction>> {
        Vec::new()
    }

    /// Fully-qualified types the parser should know about, so that wildcard
    /// imports of them resolve.
    fn classpath(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Every recipe that ships with the crate, in its default configuration.
pub fn builtin() -> Result<Vec<Box<dyn Recipe>>> {
    Ok(vec![Box::new(update_mock_web_server()?)])
}
