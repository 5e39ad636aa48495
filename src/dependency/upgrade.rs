//! Dependency version upgrades in Maven and Gradle build files.

use super::version::{VersionSelector, compare_versions};
use super::SecondaryAction;
use crate::error::{RefactorError, Result};
use crate::matcher::file::{DEFAULT_EXCLUDES, FileMatcher};
use crate::transform::FileChange;
use regex::Regex;
use std::cmp::Ordering;
use std::fs;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info};

const MANIFESTS: &[&str] = &["**/pom.xml", "**/build.gradle", "**/build.gradle.kts"];

/// Moves a dependency to the newest known version matching a selector.
///
/// Declarations already at or above the selected version are left alone.
#[derive(Debug, Clone)]
pub struct UpgradeDependencyVersion {
    group: String,
    artifact: String,
    selector: VersionSelector,
    known_versions: Vec<String>,
}

impl UpgradeDependencyVersion {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        selector: &str,
        known_versions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            selector: VersionSelector::parse(selector),
            known_versions: known_versions.into_iter().map(Into::into).collect(),
        }
    }

    fn target_version(&self) -> Result<&str> {
        self.selector.select(&self.known_versions).ok_or_else(|| {
            RefactorError::InvalidConfig(format!(
                "no known version of {}:{} matches {}",
                self.group, self.artifact, self.selector
            ))
        })
    }

    /// Rewrites the dependency's version in one manifest.
    pub fn upgrade_manifest(&self, path: &Path, content: &str) -> Result<String> {
        let target = self.target_version()?;
        let is_maven = path.file_name().is_some_and(|name| name == "pom.xml");
        let edits = if is_maven {
            self.maven_edits(content)?
        } else {
            self.gradle_edits(content)?
        };

        let mut updated = content.to_string();
        for (range, current) in edits.into_iter().rev() {
            if compare_versions(&current, target) == Ordering::Less {
                info!(
                    path = %path.display(),
                    dependency = %format!("{}:{}", self.group, self.artifact),
                    from = %current,
                    to = target,
                    "Upgrading dependency"
                );
                updated.replace_range(range, target);
            }
        }
        Ok(updated)
    }

    /// Positions of the version values that control the dependency.
    fn maven_edits(&self, content: &str) -> Result<Vec<(Range<usize>, String)>> {
        let block = Regex::new(r"(?s)<dependency>.*?</dependency>")?;
        let group = Regex::new(&format!(
            r"<groupId>\s*{}\s*</groupId>",
            regex::escape(&self.group)
        ))?;
        let artifact = Regex::new(&format!(
            r"<artifactId>\s*{}\s*</artifactId>",
            regex::escape(&self.artifact)
        ))?;
        let version = Regex::new(r"<version>\s*([^<\s]+)\s*</version>")?;

        let mut edits = Vec::new();
        for dependency in block.find_iter(content) {
            let text = dependency.as_str();
            if !group.is_match(text) || !artifact.is_match(text) {
                continue;
            }
            let Some(value) = version.captures(text).and_then(|c| c.get(1)) else {
                continue;
            };
            let current = value.as_str();
            match current
                .strip_prefix("${")
                .and_then(|rest| rest.strip_suffix('}'))
            {
                Some(property) => {
                    let definition = Regex::new(&format!(
                        r"<{0}>\s*([^<\s]+)\s*</{0}>",
                        regex::escape(property)
                    ))?;
                    match definition.captures(content).and_then(|c| c.get(1)) {
                        Some(defined) => {
                            edits.push((defined.range(), defined.as_str().to_string()));
                        }
                        None => debug!(property, "Version property is not defined locally"),
                    }
                }
                None => {
                    let start = dependency.start() + value.start();
                    edits.push((start..start + value.len(), current.to_string()));
                }
            }
        }

        edits.sort_by_key(|(range, _)| range.start);
        edits.dedup_by_key(|(range, _)| range.start);
        Ok(edits)
    }

    /// Positions of `"group:artifact:version"` string notation versions.
    fn gradle_edits(&self, content: &str) -> Result<Vec<(Range<usize>, String)>> {
        let notation = Regex::new(&format!(
            r#"["']{}:{}:([^"'$\s:@]+)"#,
            regex::escape(&self.group),
            regex::escape(&self.artifact)
        ))?;
        Ok(notation
            .captures_iter(content)
            .filter_map(|c| c.get(1))
            .map(|m| (m.range(), m.as_str().to_string()))
            .collect())
    }
}

impl SecondaryAction for UpgradeDependencyVersion {
    fn name(&self) -> &str {
        "upgrade-dependency-version"
    }

    fn describe(&self) -> String {
        format!(
            "upgrade {}:{} to {}",
            self.group, self.artifact, self.selector
        )
    }

    fn run(&self, root: &Path) -> Result<Vec<FileChange>> {
        let matcher = MANIFESTS
            .iter()
            .fold(FileMatcher::new(), |m, glob| m.include(*glob));
        let matcher = DEFAULT_EXCLUDES.iter().fold(matcher, |m, glob| m.exclude(*glob));

        let mut changes = Vec::new();
        for path in matcher.collect(root)? {
            let original = fs::read_to_string(&path).map_err(|e| RefactorError::Manifest {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let transformed = self.upgrade_manifest(&path, &original)?;
            let change = FileChange::new(path, original, transformed);
            if change.is_modified() {
                changes.push(change);
            }
        }
        Ok(changes)
    }
}
