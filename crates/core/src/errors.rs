//! Error types for the ticketmerge core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.
//!
//! Only the hard stops of a merge check are errors. Clean stops such as
//! "nothing to merge" are reported through
//! [`AnalysisOutcome`](crate::merge::AnalysisOutcome), and malformed log or
//! merge-info input is absorbed as [`ParseWarning`](crate::models::ParseWarning)s.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Svn(#[from] SvnError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

// ---------------------------------------------------------------------------
// SVN errors
// ---------------------------------------------------------------------------

/// Errors from SVN CLI operations.
#[derive(Debug, Error)]
pub enum SvnError {
    /// The `svn` binary was not found on `$PATH`.
    #[error("svn binary not found: {0}")]
    BinaryNotFound(String),

    /// An `svn` command exited with a non-zero status.
    #[error("svn command failed (exit {exit_code}): {stderr}")]
    CommandFailed {
        exit_code: i32,
        stderr: String,
    },

    /// Generic I/O wrapper.
    #[error("svn I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Analysis errors
// ---------------------------------------------------------------------------

/// Terminal outcomes of a merge check that abort the run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A requested or ignored revision is not an integer.
    #[error("invalid revision '{token}' in {argument}")]
    InvalidRevision {
        argument: String,
        token: String,
    },

    /// The `--range` argument is not of the form `N:M`.
    #[error("invalid revision range '{0}', expected <from>:<to>")]
    InvalidRange(String),

    /// `svn:mergeinfo` is empty on the working copy.
    #[error("no merge info present on the working copy")]
    NoMergeInfo,

    /// `svn:mergeinfo` has no entry for the source path.
    #[error("No merges from {0} present!")]
    NoMergesFromSource(String),
}

impl AnalysisError {
    /// `true` for errors caused by malformed command-line input.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidRevision { .. } | Self::InvalidRange(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = AnalysisError::NoMergesFromSource("/trunk/app".into());
        assert_eq!(err.to_string(), "No merges from /trunk/app present!");

        let err = AnalysisError::InvalidRevision {
            argument: "--revisions".into(),
            token: "12a".into(),
        };
        assert_eq!(err.to_string(), "invalid revision '12a' in --revisions");

        let err = SvnError::CommandFailed {
            exit_code: 1,
            stderr: "E155007: not a working copy".into(),
        };
        assert!(err.to_string().contains("E155007"));

        let err = ConfigError::InvalidValue {
            field: "svn.source_path".into(),
            detail: "must start with '/'".into(),
        };
        assert!(err.to_string().contains("svn.source_path"));
    }

    #[test]
    fn test_usage_classification() {
        assert!(AnalysisError::InvalidRange("8000".into()).is_usage());
        assert!(AnalysisError::InvalidRevision {
            argument: "--ignore".into(),
            token: "x".into()
        }
        .is_usage());
        assert!(!AnalysisError::NoMergeInfo.is_usage());
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let core_err: CoreError = AnalysisError::NoMergeInfo.into();
        assert!(matches!(core_err, CoreError::Analysis(_)));

        let core_err: CoreError = SvnError::BinaryNotFound("svn".into()).into();
        assert!(matches!(core_err, CoreError::Svn(_)));
    }
}
