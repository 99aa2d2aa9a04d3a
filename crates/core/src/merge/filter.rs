//! Removal of commits already recorded in `svn:mergeinfo`.
//!
//! Both inputs must be ascending: commits by revision, ranges by `from`.
//! [`ensure_ascending`] establishes that at the boundary; the filter itself
//! never re-sorts.

use tracing::{debug, warn};

use crate::models::{Commit, MergeRange};

/// Index of the first range that contains `revision` or starts after it.
///
/// `None` when `ranges` is empty or every range ends before `revision`.
pub fn find_range_position(ranges: &[MergeRange], revision: i64) -> Option<usize> {
    ranges
        .iter()
        .position(|r| r.contains(revision) || revision < r.from)
}

/// `true` if `revision` lies in any range at or after `start`.
pub fn is_merged(ranges: &[MergeRange], revision: i64, start: usize) -> bool {
    ranges
        .get(start..)
        .is_some_and(|tail| tail.iter().any(|r| r.contains(revision)))
}

/// Drop the commits that `ranges` records as merged.
///
/// The start offset is located from the first commit; if no range reaches
/// that far, nothing has been merged from the window and every commit is kept.
pub fn filter_merged(commits: Vec<Commit>, ranges: &[MergeRange]) -> Vec<Commit> {
    let Some(first) = commits.first() else {
        return commits;
    };
    let Some(start) = find_range_position(ranges, first.revision) else {
        debug!(first = first.revision, "no merge range reaches the log window, keeping all commits");
        return commits;
    };

    let before = commits.len();
    let pending: Vec<Commit> = commits
        .into_iter()
        .filter(|c| !is_merged(ranges, c.revision, start))
        .collect();
    debug!(start, before, after = pending.len(), "filtered merged commits");
    pending
}

/// Sort commits by revision and ranges by `from` if either is out of order.
pub fn ensure_ascending(commits: &mut [Commit], ranges: &mut [MergeRange]) {
    if !commits.windows(2).all(|w| w[0].revision <= w[1].revision) {
        warn!("svn log is not in ascending revision order, sorting");
        commits.sort_by_key(|c| c.revision);
    }
    if !ranges.windows(2).all(|w| w[0].from <= w[1].from) {
        warn!("merge ranges are not in ascending order, sorting");
        ranges.sort_by_key(|r| r.from);
    }
}
