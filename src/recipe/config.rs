//! Serializable settings for the rule-to-lifecycle migration.

use crate::error::{RefactorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coordinates of the dependency upgraded alongside the migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    pub group: String,
    pub artifact: String,
    /// `4.X`, `latest.release` or an exact version.
    pub selector: String,
    /// Versions the selector chooses from.
    pub known_versions: Vec<String>,
}

/// Which annotated field to migrate and what to generate for it.
///
/// Every field has a default, so a config file only needs the values that
/// differ from the okhttp3 `MockWebServer` migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleMigrationConfig {
    pub rule_annotation: String,
    pub after_annotation: String,
    pub tracked_type: String,
    pub close_method: String,
    pub exception_type: String,
    pub method_name: String,
    pub dependency: Option<DependencyConfig>,
}

impl Default for RuleMigrationConfig {
    fn default() -> Self {
        Self {
            rule_annotation: "org.junit.Rule".into(),
            after_annotation: "org.junit.jupiter.api.AfterEach".into(),
            tracked_type: "okhttp3.mockwebserver.MockWebServer".into(),
            close_method: "close".into(),
            exception_type: "java.io.IOException".into(),
            method_name: "afterEachTest".into(),
            dependency: Some(DependencyConfig {
                group: "com.squareup.okhttp3".into(),
                artifact: "mockwebserver".into(),
                selector: "4.X".into(),
                known_versions: [
                    "3.14.9", "4.0.0", "4.0.1", "4.1.0", "4.2.2", "4.3.1", "4.4.1", "4.5.0",
                    "4.6.0", "4.7.2", "4.8.1", "4.9.0", "4.9.1", "4.9.2", "4.9.3", "4.10.0",
                    "4.11.0", "4.12.0",
                ]
                .map(String::from)
                .to_vec(),
            }),
        }
    }
}

impl RuleMigrationConfig {
    /// Loads a config file, YAML or JSON by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RefactorError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file {}: {}", path.display(), e),
            ))
        })?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every type name is fully qualified.
    pub fn validate(&self) -> Result<()> {
        for (field, fqn) in [
            ("rule_annotation", &self.rule_annotation),
            ("after_annotation", &self.after_annotation),
            ("tracked_type", &self.tracked_type),
            ("exception_type", &self.exception_type),
        ] {
            if !fqn.contains('.') || fqn.starts_with('.') || fqn.ends_with('.') {
                return Err(RefactorError::InvalidConfig(format!(
                    "{field} must be a fully-qualified type name, got `{fqn}`"
                )));
            }
        }
        if self.close_method.is_empty() || self.method_name.is_empty() {
            return Err(RefactorError::InvalidConfig(
                "close_method and method_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn simple_name(fqn: &str) -> &str {
        fqn.rsplit_once('.').map(|(_, s)| s).unwrap_or(fqn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("migration.yaml");
        std::fs::write(
            &path,
            "tracked_type: com.example.Server\nclose_method: shutdown\ndependency: null\n",
        )
        .unwrap();

        let config = RuleMigrationConfig::from_file(&path).unwrap();

        assert_eq!(config.tracked_type, "com.example.Server");
        assert_eq!(config.close_method, "shutdown");
        assert_eq!(config.rule_annotation, "org.junit.Rule");
        assert!(config.dependency.is_none());
    }

    #[test]
    fn test_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("migration.json");
        std::fs::write(&path, r#"{"method_name": "tearDown"}"#).unwrap();

        let config = RuleMigrationConfig::from_file(&path).unwrap();

        assert_eq!(config.method_name, "tearDown");
        assert_eq!(
            config.dependency.unwrap().selector,
            RuleMigrationConfig::default().dependency.unwrap().selector
        );
    }

    #[test]
    fn test_unqualified_type_is_rejected() {
        let config = RuleMigrationConfig {
            exception_type: "IOException".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RefactorError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("migration.yml");
        std::fs::write(&path, "method_name: [unclosed\n").unwrap();

        let err = RuleMigrationConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, RefactorError::Yaml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RuleMigrationConfig::from_file("/nonexistent/migration.yaml").unwrap_err();
        assert!(matches!(err, RefactorError::Io(_)));
    }
}
