//! Files and revisions excluded from collision detection.
//!
//! Ignore entries are written relative to the source path, while `svn log`
//! reports repository-absolute paths, so every entry is prefixed with the
//! source path before matching. Entries containing glob metacharacters are
//! matched with [`glob_match`]; all others by exact equality.

use std::collections::HashSet;

use glob_match::glob_match;
use tracing::debug;

const GLOB_CHARS: [char; 4] = ['*', '?', '[', '{'];

#[derive(Debug, Clone, Default)]
pub struct IgnorePolicy {
    exact_files: HashSet<String>,
    file_patterns: Vec<String>,
    revisions: HashSet<i64>,
}

impl IgnorePolicy {
    /// Build the policy for `source_path` from relative file entries and
    /// revision numbers.
    pub fn new<F, R>(source_path: &str, files: F, revisions: R) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        R: IntoIterator<Item = i64>,
    {
        let mut policy = Self {
            revisions: revisions.into_iter().collect(),
            ..Self::default()
        };
        for entry in files {
            let full_path = format!("{}{}", source_path, entry.as_ref().trim());
            if full_path.contains(GLOB_CHARS) {
                policy.file_patterns.push(full_path);
            } else {
                policy.exact_files.insert(full_path);
            }
        }
        debug!(
            files = policy.exact_files.len(),
            patterns = policy.file_patterns.len(),
            revisions = policy.revisions.len(),
            "built ignore policy"
        );
        policy
    }

    /// Add more ignored revisions, e.g. the checked revisions of a run.
    pub fn ignore_revisions<R: IntoIterator<Item = i64>>(&mut self, revisions: R) {
        self.revisions.extend(revisions);
    }

    pub fn is_file_ignored(&self, path: &str) -> bool {
        self.exact_files.contains(path) || self.file_patterns.iter().any(|p| glob_match(p, path))
    }

    pub fn is_revision_ignored(&self, revision: i64) -> bool {
        self.revisions.contains(&revision)
    }
}
