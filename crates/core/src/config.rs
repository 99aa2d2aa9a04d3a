//! TOML-based configuration system for ticketmerge.
//!
//! The configuration names the source path revisions are merged from, the
//! working copy they are merged into, and the files and revisions that never
//! take part in collision detection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SVN repository settings.
    pub svn: SvnConfig,

    /// Collision detection settings.
    #[serde(default)]
    pub merge: MergeConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// SVN
// ---------------------------------------------------------------------------

/// SVN repository locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvnConfig {
    /// Repository root URL (e.g. `https://svn.example.com/svn/project`).
    pub repo_url: String,

    /// Path revisions are merged from, relative to the repository root
    /// (e.g. `/trunk/project`). Also the key looked up in `svn:mergeinfo`.
    #[serde(default = "default_source_path")]
    pub source_path: String,

    /// Local working copy of the merge target.
    pub working_copy: PathBuf,
}

fn default_source_path() -> String {
    "/trunk".into()
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Files and revisions excluded from collision detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Paths relative to `svn.source_path`; glob patterns are allowed.
    #[serde(default)]
    pub ignore_files: Vec<String>,

    /// Revisions that are never reported or expanded.
    #[serde(default)]
    pub ignore_revisions: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.svn.repo_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "svn.repo_url".into(),
                detail: "repository URL must not be empty".into(),
            });
        }
        if !self.svn.source_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "svn.source_path".into(),
                detail: "source path must start with '/'".into(),
            });
        }
        if self.svn.working_copy.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "svn.working_copy".into(),
                detail: "working copy path must not be empty".into(),
            });
        }
        if let Some(entry) = self.merge.ignore_files.iter().find(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "merge.ignore_files".into(),
                detail: format!("empty entry '{}'", entry),
            });
        }
        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Commented default configuration written by `ticketmerge init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# ticketmerge configuration

[svn]
# Repository root URL.
repo_url = "https://svn.example.com/svn/project"
# Path revisions are merged from; must match the key in svn:mergeinfo.
source_path = "/trunk/project"
# Working copy of the branch that receives the merge.
working_copy = "/path/to/project-release"

[merge]
# Files (relative to source_path) that never cause a collision.
ignore_files = [
    "/WebContent/index.html",
]
# Revisions that are never reported.
ignore_revisions = []

[logging]
log_level = "warn"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
[svn]
repo_url = "https://svn.example.com/svn/project"
source_path = "/trunk/project"
working_copy = "/home/me/project-release"

[merge]
ignore_files = ["/WebContent/index.html", "/build/*.properties"]
ignore_revisions = [8001, 8002]

[logging]
log_level = "debug"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::from_toml(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.svn.source_path, "/trunk/project");
        assert_eq!(config.svn.working_copy, PathBuf::from("/home/me/project-release"));
        assert_eq!(config.merge.ignore_files.len(), 2);
        assert_eq!(config.merge.ignore_revisions, vec![8001, 8002]);
        assert_eq!(config.logging.log_level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(sample_toml().as_bytes()).unwrap();

        let config = AppConfig::load_and_validate(&path).expect("load_and_validate failed");
        assert_eq!(config.svn.repo_url, "https://svn.example.com/svn/project");
    }

    #[test]
    fn test_file_not_found() {
        let result = AppConfig::load_from_file("/nonexistent/ticketmerge.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = AppConfig::from_toml("[svn]\nrepo_url = 5\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_defaults() {
        let minimal = r#"
[svn]
repo_url = "file:///srv/repo"
working_copy = "/tmp/wc"
"#;
        let config = AppConfig::from_toml(minimal).unwrap();
        assert_eq!(config.svn.source_path, "/trunk");
        assert!(config.merge.ignore_files.is_empty());
        assert!(config.merge.ignore_revisions.is_empty());
        assert_eq!(config.logging.log_level, "warn");
    }

    #[test]
    fn test_validate_rejects_relative_source_path() {
        let mut config = AppConfig::from_toml(sample_toml()).unwrap();
        config.svn.source_path = "trunk/project".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "svn.source_path"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut config = AppConfig::from_toml(sample_toml()).unwrap();
        config.svn.repo_url = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "svn.repo_url"
        ));
    }

    #[test]
    fn test_default_config_template_is_valid() {
        let config = AppConfig::from_toml(DEFAULT_CONFIG_TOML).unwrap();
        assert!(config.validate().is_ok());
    }
}
