//! End-to-end merge check: raw `svn` output in, grouped collisions out.
//!
//! [`MergeAnalyzer::analyze`] takes the two texts produced by
//! [`SvnClient`](crate::svn::SvnClient) (or read from files) and walks the
//! pipeline: parse the log, pick the requested revisions that are pending,
//! parse merge info, filter merged commits, run the collision engine and
//! aggregate the result.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::errors::AnalysisError;
use crate::merge::collision::CollisionEngine;
use crate::merge::filter::{ensure_ascending, filter_merged};
use crate::merge::ignore::IgnorePolicy;
use crate::merge::report::CollisionReport;
use crate::models::{CollisionRecord, ParseWarning};
use crate::svn::{parse_log, parse_mergeinfo};

/// What the operator asked to check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRequest {
    /// Revisions to be merged, in the order given.
    pub revisions: Vec<i64>,
    /// Extra revisions to leave out of collision detection for this run.
    pub ignore_revisions: Vec<i64>,
    /// Asked for with `--revision` rather than `--revisions`.
    pub single: bool,
}

impl MergeRequest {
    /// Several revisions merged together (`--revisions`), even if only one is listed.
    pub fn new(revisions: Vec<i64>) -> Self {
        Self {
            revisions,
            ignore_revisions: Vec::new(),
            single: false,
        }
    }

    /// One revision (`--revision`).
    pub fn single(revision: i64) -> Self {
        Self {
            single: true,
            ..Self::new(vec![revision])
        }
    }

    pub fn with_ignored(mut self, revisions: Vec<i64>) -> Self {
        self.ignore_revisions = revisions;
        self
    }

    pub fn is_single(&self) -> bool {
        self.single
    }
}

/// Result of a merge check that ran to a conclusion.
#[derive(Debug, Clone, Serialize)]
pub struct MergeAnalysis {
    pub requested: Vec<i64>,
    pub single: bool,
    /// Requested revisions present in the log.
    pub checked: Vec<i64>,
    /// Requested revisions absent from the log.
    pub missing: Vec<i64>,
    /// Checked revisions that merge info already records as merged.
    pub already_merged: Vec<i64>,
    /// Commits still to be merged after filtering.
    pub pending_count: usize,
    pub collisions: Vec<CollisionRecord>,
    pub report: CollisionReport,
    pub warnings: Vec<ParseWarning>,
}

impl MergeAnalysis {
    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }

    pub fn summary_lines(&self) -> Vec<String> {
        self.report.summary_lines(&self.checked, self.single)
    }

    pub fn one_liner(&self) -> String {
        self.report.one_liner(&self.checked)
    }
}

/// How a merge check ended, short of a hard stop.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// The log for the range is empty.
    NothingToMerge,
    /// None of the requested revisions is in the log.
    NotInMergeList { requested: Vec<i64>, single: bool },
    Completed(MergeAnalysis),
}

impl AnalysisOutcome {
    /// Operator-facing message for the clean stops.
    pub fn stop_message(&self) -> Option<String> {
        match self {
            Self::NothingToMerge => Some("No revisions to merge".to_string()),
            Self::NotInMergeList { requested, single } => Some(match requested.first() {
                Some(revision) if *single => format!(
                    "The provided revision number [{}] is not in the merge list",
                    revision
                ),
                _ => "None of the provided revision numbers is in the merge list".to_string(),
            }),
            Self::Completed(_) => None,
        }
    }
}

/// Runs merge checks for one source path.
#[derive(Debug, Clone)]
pub struct MergeAnalyzer {
    source_path: String,
    ignore_files: Vec<String>,
    ignore_revisions: Vec<i64>,
}

impl MergeAnalyzer {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            ignore_files: Vec::new(),
            ignore_revisions: Vec::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.svn.source_path)
            .with_ignore_files(config.merge.ignore_files.clone())
            .with_ignore_revisions(config.merge.ignore_revisions.clone())
    }

    pub fn with_ignore_files(mut self, files: Vec<String>) -> Self {
        self.ignore_files = files;
        self
    }

    pub fn with_ignore_revisions(mut self, revisions: Vec<i64>) -> Self {
        self.ignore_revisions = revisions;
        self
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn analyze(
        &self,
        request: &MergeRequest,
        log_text: &str,
        mergeinfo_text: &str,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let parsed_log = parse_log(log_text);
        let mut commits = parsed_log.commits;
        let mut warnings = parsed_log.warnings;
        if commits.is_empty() {
            info!("no revisions in the requested range");
            return Ok(AnalysisOutcome::NothingToMerge);
        }

        let mut checked = Vec::new();
        let mut missing = Vec::new();
        for &revision in &request.revisions {
            if commits.iter().any(|c| c.revision == revision) {
                if !checked.contains(&revision) {
                    checked.push(revision);
                }
            } else {
                warn!(revision, "requested revision is not in the merge list");
                missing.push(revision);
            }
        }
        if checked.is_empty() {
            return Ok(AnalysisOutcome::NotInMergeList {
                requested: request.revisions.clone(),
                single: request.is_single(),
            });
        }

        if mergeinfo_text.trim().is_empty() {
            return Err(AnalysisError::NoMergeInfo);
        }
        let parsed_info = parse_mergeinfo(mergeinfo_text);
        warnings.extend(parsed_info.warnings);
        let mut ranges = parsed_info
            .info
            .ranges_for(&self.source_path)
            .ok_or_else(|| AnalysisError::NoMergesFromSource(self.source_path.clone()))?
            .to_vec();

        ensure_ascending(&mut commits, &mut ranges);
        let pending = filter_merged(commits, &ranges);
        let already_merged: Vec<i64> = checked
            .iter()
            .copied()
            .filter(|r| !pending.iter().any(|c| c.revision == *r))
            .collect();
        info!(pending = pending.len(), "commits to be merged");

        let mut ignore = IgnorePolicy::new(
            &self.source_path,
            &self.ignore_files,
            self.ignore_revisions
                .iter()
                .chain(&request.ignore_revisions)
                .copied(),
        );
        ignore.ignore_revisions(checked.iter().copied());

        let mut engine = CollisionEngine::new(&pending, &ignore);
        for &revision in &checked {
            engine.check(revision);
        }
        let collisions = engine.finish();
        let report = CollisionReport::from_records(&collisions);
        debug!(
            collisions = collisions.len(),
            tickets = report.groups.len(),
            "merge check complete"
        );

        Ok(AnalysisOutcome::Completed(MergeAnalysis {
            requested: request.revisions.clone(),
            single: request.is_single(),
            checked,
            missing,
            already_merged,
            pending_count: pending.len(),
            collisions,
            report,
            warnings,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVIDER: &str = "------------------------------------------------------------------------";

    fn log_entry(revision: i64, ticket: &str, files: &[&str]) -> String {
        let mut out = format!(
            "{}\nr{} | dev | 2024-01-01 12:00:00 +0000 | 1 line\nChanged paths:\n",
            DIVIDER, revision
        );
        for f in files {
            out.push_str(&format!("   M {}\n", f));
        }
        out.push_str(&format!("\n[App] (OP {}) change\n", ticket));
        out
    }

    fn log(entries: &[String]) -> String {
        format!("{}{}\n", entries.concat(), DIVIDER)
    }

    fn completed(outcome: AnalysisOutcome) -> MergeAnalysis {
        match outcome {
            AnalysisOutcome::Completed(analysis) => analysis,
            other => panic!("expected completed analysis, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_log_is_nothing_to_merge() {
        let analyzer = MergeAnalyzer::new("/trunk/app");
        let outcome = analyzer
            .analyze(&MergeRequest::single(5), "", "/trunk/app:1")
            .unwrap();
        assert!(matches!(outcome, AnalysisOutcome::NothingToMerge));
        assert_eq!(outcome.stop_message().as_deref(), Some("No revisions to merge"));
    }

    #[test]
    fn test_requested_revision_not_in_log() {
        let analyzer = MergeAnalyzer::new("/trunk/app");
        let text = log(&[log_entry(10, "1", &["/trunk/app/a"])]);
        let outcome = analyzer
            .analyze(&MergeRequest::single(11), &text, "/trunk/app:1")
            .unwrap();
        assert_eq!(
            outcome.stop_message().as_deref(),
            Some("The provided revision number [11] is not in the merge list")
        );

        // A one-element --revisions list keeps the plural wording.
        let outcome = analyzer
            .analyze(&MergeRequest::new(vec![11]), &text, "/trunk/app:1")
            .unwrap();
        assert_eq!(
            outcome.stop_message().as_deref(),
            Some("None of the provided revision numbers is in the merge list")
        );

        let outcome = analyzer
            .analyze(&MergeRequest::new(vec![11, 12]), &text, "/trunk/app:1")
            .unwrap();
        assert_eq!(
            outcome.stop_message().as_deref(),
            Some("None of the provided revision numbers is in the merge list")
        );
    }

    #[test]
    fn test_empty_mergeinfo_is_hard_stop() {
        let analyzer = MergeAnalyzer::new("/trunk/app");
        let text = log(&[log_entry(10, "1", &["/trunk/app/a"])]);
        let err = analyzer
            .analyze(&MergeRequest::new(vec![10]), &text, "  \n")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoMergeInfo));
    }

    #[test]
    fn test_missing_source_entry_is_hard_stop() {
        let analyzer = MergeAnalyzer::new("/trunk/app");
        let text = log(&[log_entry(10, "1", &["/trunk/app/a"])]);
        let err = analyzer
            .analyze(&MergeRequest::new(vec![10]), &text, "/branches/other:1-5\n")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoMergesFromSource(ref p) if p == "/trunk/app"));
    }

    #[test]
    fn test_checked_revisions_do_not_collide_with_each_other() {
        let analyzer = MergeAnalyzer::new("/trunk/app");
        let text = log(&[
            log_entry(10, "1", &["/trunk/app/a"]),
            log_entry(20, "2", &["/trunk/app/a"]),
            log_entry(30, "3", &["/trunk/app/a"]),
        ]);
        let analysis = completed(
            analyzer
                .analyze(&MergeRequest::new(vec![30, 20]), &text, "/trunk/app:1-5\n")
                .unwrap(),
        );
        assert_eq!(analysis.checked, vec![30, 20]);
        let revisions: Vec<i64> = analysis.collisions.iter().map(|c| c.revision).collect();
        assert_eq!(revisions, vec![10]);
    }

    #[test]
    fn test_missing_and_already_merged_are_reported() {
        let analyzer = MergeAnalyzer::new("/trunk/app");
        let text = log(&[
            log_entry(100, "1", &["/trunk/app/a"]),
            log_entry(120, "2", &["/trunk/app/b"]),
            log_entry(160, "3", &["/trunk/app/b"]),
        ]);
        let request = MergeRequest::new(vec![160, 120, 999]);
        let analysis = completed(analyzer.analyze(&request, &text, "/trunk/app:110-150\n").unwrap());
        assert_eq!(analysis.missing, vec![999]);
        assert_eq!(analysis.already_merged, vec![120]);
        assert_eq!(analysis.pending_count, 2);
        assert!(!analysis.has_collisions());
    }

    #[test]
    fn test_summary_wording_follows_request_kind() {
        let analyzer = MergeAnalyzer::new("/trunk/app");
        let text = log(&[
            log_entry(10, "1", &["/trunk/app/a"]),
            log_entry(20, "2", &["/trunk/app/a"]),
        ]);

        let single = completed(
            analyzer
                .analyze(&MergeRequest::single(20), &text, "/trunk/app:1\n")
                .unwrap(),
        );
        assert!(single.single);
        assert_eq!(
            single.summary_lines()[0],
            "Revision [20] collides with the following commits:"
        );

        let listed = completed(
            analyzer
                .analyze(&MergeRequest::new(vec![20]), &text, "/trunk/app:1\n")
                .unwrap(),
        );
        assert_eq!(
            listed.summary_lines()[0],
            "Provided revisions [20] collide with the following commits:"
        );
        assert_eq!(listed.one_liner(), "20 - 10(#1)");
    }

    #[test]
    fn test_config_and_request_ignores_are_combined() {
        let analyzer = MergeAnalyzer::new("/trunk/app")
            .with_ignore_files(vec!["/shared.xml".into()])
            .with_ignore_revisions(vec![10]);
        let text = log(&[
            log_entry(5, "5", &["/trunk/app/shared.xml"]),
            log_entry(10, "1", &["/trunk/app/a"]),
            log_entry(20, "2", &["/trunk/app/b"]),
            log_entry(30, "3", &["/trunk/app/a", "/trunk/app/b", "/trunk/app/shared.xml"]),
        ]);
        let request = MergeRequest::new(vec![30]).with_ignored(vec![20]);
        let analysis = completed(analyzer.analyze(&request, &text, "/trunk/app:1\n").unwrap());
        assert!(analysis.collisions.is_empty());
    }
}
