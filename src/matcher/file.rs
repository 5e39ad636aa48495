//! Source file selection.

use crate::error::Result;
use crate::lang::{Java, Language};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories that never hold sources worth rewriting.
pub const DEFAULT_EXCLUDES: &[&str] = &["**/target/**", "**/build/**", "**/.git/**"];

/// Predicates for selecting the files of a project.
#[derive(Default, Clone, Debug)]
pub struct FileMatcher {
    extensions: Vec<String>,
    include_globs: Vec<String>,
    exclude_globs: Vec<String>,
    content_patterns: Vec<String>,
}

impl FileMatcher {
    /// Creates a matcher that accepts every file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files of `language` outside build output and VCS directories.
    pub fn sources(language: &dyn Language) -> Self {
        let matcher = language
            .extensions()
            .iter()
            .fold(Self::new(), |m, ext| m.extension(*ext));
        DEFAULT_EXCLUDES
            .iter()
            .fold(matcher, |m, glob| m.exclude(*glob))
    }

    /// `*.java` files outside build output and VCS directories.
    pub fn java_sources() -> Self {
        Self::sources(&Java)
    }

    /// Matches files with the given extension (without dot).
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions.push(ext.into());
        self
    }

    /// Includes files matching the glob pattern, relative to the root.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_globs.push(pattern.into());
        self
    }

    /// Excludes files matching the glob pattern, relative to the root.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_globs.push(pattern.into());
        self
    }

    /// Only matches files containing the given regex pattern.
    pub fn contains_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.content_patterns.push(pattern.into());
        self
    }

    /// Collects all matching files under `root`, sorted by path.
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let include_set = build_glob_set(&self.include_globs)?;
        let exclude_set = build_glob_set(&self.exclude_globs)?;
        let content_regexes = self
            .content_patterns
            .iter()
            .map(|p| Ok(Regex::new(p)?))
            .collect::<Result<Vec<_>>>()?;

        let mut matched = Vec::new();

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            if !self.extensions.is_empty() {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                    continue;
                }
            }

            let rel_path = path.strip_prefix(root).unwrap_or(path);
            if !self.include_globs.is_empty() && !include_set.is_match(rel_path) {
                continue;
            }
            if exclude_set.is_match(rel_path) {
                continue;
            }

            // Reading is the expensive part, so it comes last.
            if !content_regexes.is_empty() {
                let Ok(content) = fs::read_to_string(path) else {
                    continue;
                };
                if !content_regexes.iter().any(|re| re.is_match(&content)) {
                    continue;
                }
            }

            matched.push(path.to_path_buf());
        }

        matched.sort();
        Ok(matched)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
