//! Project runner: applies recipes to every Java source under a root.

use crate::context::{Diagnostic, ExecutionContext};
use crate::dependency::{ActionReport, run_actions};
use crate::diff::{DiffSummary, colorized_diff};
use crate::error::{RefactorError, Result};
use crate::lang::JavaParser;
use crate::matcher::FileMatcher;
use crate::recipe::Recipe;
use crate::transform::FileChange;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// The outcome of a rewrite run.
#[derive(Debug)]
pub struct RewriteResult {
    pub root: PathBuf,
    /// Modified source files.
    pub changes: Vec<FileChange>,
    /// Line counts over source and build file changes.
    pub summary: DiffSummary,
    pub actions: Vec<ActionReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RewriteResult {
    /// Returns the number of files that were modified.
    pub fn files_modified(&self) -> usize {
        self.all_changes().count()
    }

    /// Source changes followed by the changes of secondary actions.
    pub fn all_changes(&self) -> impl Iterator<Item = &FileChange> {
        self.changes
            .iter()
            .chain(self.actions.iter().flat_map(|a| a.changes.iter()))
            .filter(|c| c.is_modified())
    }

    /// Generates a unified diff of all changes.
    pub fn diff(&self) -> String {
        self.all_changes()
            .map(|c| c.diff(&self.root))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Generates a colorized diff for terminal display.
    pub fn colorized_diff(&self) -> String {
        self.all_changes()
            .map(|c| {
                let path = c.path.strip_prefix(&self.root).unwrap_or(&c.path);
                colorized_diff(&c.original, &c.transformed, path)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builder for a rewrite run.
///
/// ```rust,no_run
/// use rewrite_dsl::prelude::*;
///
/// let result = Rewrite::in_repo("./my-service")
///     .recipe(update_mock_web_server()?)
///     .dry_run()
///     .run()?;
/// println!("{}", result.diff());
/// # Ok::<(), rewrite_dsl::error::RefactorError>(())
/// ```
pub struct Rewrite {
    root: PathBuf,
    recipes: Vec<Box<dyn Recipe>>,
    files: FileMatcher,
    options: Vec<(String, String)>,
    dry_run: bool,
    skip_dependencies: bool,
}

impl Rewrite {
    /// Creates a rewrite rooted at the given path.
    pub fn in_repo(path: impl Into<PathBuf>) -> Self {
        Self {
            root: path.into(),
            recipes: Vec::new(),
            files: FileMatcher::java_sources(),
            options: Vec::new(),
            dry_run: false,
            skip_dependencies: false,
        }
    }

    /// Creates a rewrite in the current directory.
    pub fn current_dir() -> Result<Self> {
        Ok(Self::in_repo(std::env::current_dir()?))
    }

    /// Adds a recipe. Recipes run in the order they were added.
    pub fn recipe(mut self, recipe: impl Recipe + 'static) -> Self {
        self.recipes.push(Box::new(recipe));
        self
    }

    pub fn boxed_recipe(mut self, recipe: Box<dyn Recipe>) -> Self {
        self.recipes.push(recipe);
        self
    }

    /// Narrows the selection of source files.
    pub fn matching<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FileMatcher) -> FileMatcher,
    {
        self.files = f(self.files);
        self
    }

    /// Sets an execution context option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    /// Enables dry-run mode (preview changes without applying).
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Leaves the recipes' secondary actions out.
    pub fn skip_dependencies(mut self) -> Self {
        self.skip_dependencies = true;
        self
    }

    /// Returns the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs every recipe and returns the result.
    pub fn run(self) -> Result<RewriteResult> {
        if !self.root.is_dir() {
            return Err(RefactorError::RepoNotFound(self.root));
        }

        let ctx = self
            .options
            .iter()
            .fold(ExecutionContext::new(), |ctx, (k, v)| ctx.option(k, v));
        let parser = JavaParser::new().classpath(self.recipes.iter().flat_map(|r| r.classpath()));
        let files = self.files.collect(&self.root)?;
        debug!(root = %self.root.display(), files = files.len(), "Collected sources");

        let changes = files
            .par_iter()
            .map(|path| self.rewrite_file(&parser, path, &ctx))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let mut summary = DiffSummary::default();
        for change in &changes {
            summary.merge(&DiffSummary::from_diff(&change.original, &change.transformed));
            if !self.dry_run {
                change.apply()?;
                info!(path = %change.path.display(), "Rewrote source file");
            }
        }

        let mut actions = Vec::new();
        if !self.skip_dependencies {
            for recipe in &self.recipes {
                actions.extend(run_actions(&recipe.recipe_list(), &self.root));
            }
        }
        for change in actions.iter().flat_map(|a| a.changes.iter()) {
            summary.merge(&DiffSummary::from_diff(&change.original, &change.transformed));
            if !self.dry_run {
                change.apply()?;
                info!(path = %change.path.display(), "Updated build file");
            }
        }

        Ok(RewriteResult {
            root: self.root,
            changes,
            summary,
            actions,
            diagnostics: ctx.take_diagnostics(),
        })
    }

    /// Runs in preview mode and returns the diff.
    pub fn preview(self) -> Result<String> {
        Ok(self.dry_run().run()?.diff())
    }

    fn rewrite_file(
        &self,
        parser: &JavaParser,
        path: &Path,
        ctx: &ExecutionContext,
    ) -> Result<Option<FileChange>> {
        let original = fs::read_to_string(path)?;
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let cu = parser.parse(&original, relative)?;

        let rewritten = self
            .recipes
            .iter()
            .fold(cu.clone(), |current, recipe| recipe.visitor().visit(&current, ctx));
        if Arc::ptr_eq(&rewritten, &cu) {
            return Ok(None);
        }

        let change = FileChange::new(path, original, rewritten.to_string());
        Ok(change.is_modified().then_some(change))
    }
}
