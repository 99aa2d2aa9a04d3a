//! Domain model types used throughout ticketmerge.
//!
//! These types bridge the parsers, the merge-range filter, the collision
//! engine and the report layer.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticket identifier used when a commit comment carries no ticket marker.
pub const UNKNOWN_OPNUMBER: &str = "unknown";

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// One logged change, parsed from a single `svn log -v` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub revision: i64,
    pub user: String,
    pub timestamp: String,
    /// The "N lines" header field, kept verbatim.
    pub lines: String,
    /// Ticket identifier, or [`UNKNOWN_OPNUMBER`].
    pub opnumber: String,
    pub comment: String,
    /// Changed paths in log order. Duplicates are preserved.
    pub files: Vec<String>,
}

impl Commit {
    /// Create an otherwise empty commit for `revision`.
    pub fn new(revision: i64) -> Self {
        Self {
            revision,
            user: String::new(),
            timestamp: String::new(),
            lines: String::new(),
            opnumber: UNKNOWN_OPNUMBER.to_string(),
            comment: String::new(),
            files: Vec::new(),
        }
    }

    pub fn with_opnumber(mut self, opnumber: impl Into<String>) -> Self {
        self.opnumber = opnumber.into();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }
}

// ---------------------------------------------------------------------------
// Merge ranges
// ---------------------------------------------------------------------------

/// Closed interval `[from, to]` of revisions already merged from a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRange {
    pub from: i64,
    pub to: i64,
    /// `false` when the range carried Subversion's `*` non-inheritable marker.
    pub inheritable: bool,
}

impl MergeRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            inheritable: true,
        }
    }

    pub fn single(revision: i64) -> Self {
        Self::new(revision, revision)
    }

    pub fn contains(&self, revision: i64) -> bool {
        revision >= self.from && revision <= self.to
    }
}

impl fmt::Display for MergeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)?;
        } else {
            write!(f, "{}-{}", self.from, self.to)?;
        }
        if !self.inheritable {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// Merge ranges keyed by source path, as recorded in `svn:mergeinfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeInfo {
    sources: HashMap<String, Vec<MergeRange>>,
}

impl MergeInfo {
    /// Ranges recorded for `path`, or `None` when the path has no entry.
    pub fn ranges_for(&self, path: &str) -> Option<&[MergeRange]> {
        self.sources.get(path).map(Vec::as_slice)
    }

    /// Mutable range list for `path`, creating an empty entry if needed.
    pub fn entry(&mut self, path: impl Into<String>) -> &mut Vec<MergeRange> {
        self.sources.entry(path.into()).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

// ---------------------------------------------------------------------------
// Collisions
// ---------------------------------------------------------------------------

/// A pending commit that a requested merge would drag in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionRecord {
    pub revision: i64,
    pub opnumber: String,
    /// Overlapping paths; empty when the collision is ticket-based only.
    pub files: Vec<String>,
    pub filecollision: bool,
    /// The target revision of a file collision.
    pub collideswith: Option<i64>,
    /// 0 when found against a checked revision, +1 per closure hop.
    pub depth: u32,
}

impl CollisionRecord {
    pub fn is_indirect(&self) -> bool {
        self.depth > 0
    }
}

// ---------------------------------------------------------------------------
// Parse warnings
// ---------------------------------------------------------------------------

/// Something a parser skipped or only partially understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based log block or merge-info line number.
    pub location: usize,
    pub message: String,
}

impl ParseWarning {
    pub fn new(location: usize, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_defaults() {
        let commit = Commit::new(42);
        assert_eq!(commit.opnumber, UNKNOWN_OPNUMBER);
        assert!(commit.files.is_empty());
        assert!(commit.comment.is_empty());
    }

    #[test]
    fn test_merge_range_contains_is_inclusive() {
        let range = MergeRange::new(100, 150);
        assert!(range.contains(100));
        assert!(range.contains(150));
        assert!(!range.contains(99));
        assert!(!range.contains(151));
        assert!(MergeRange::single(7).contains(7));
    }

    #[test]
    fn test_merge_range_display() {
        assert_eq!(MergeRange::new(1, 5).to_string(), "1-5");
        assert_eq!(MergeRange::single(9).to_string(), "9");
        let mut range = MergeRange::new(3, 4);
        range.inheritable = false;
        assert_eq!(range.to_string(), "3-4*");
    }

    #[test]
    fn test_merge_info_entry_appends() {
        let mut info = MergeInfo::default();
        info.entry("/trunk/app").push(MergeRange::single(1));
        info.entry("/trunk/app").push(MergeRange::single(2));
        assert_eq!(info.ranges_for("/trunk/app").map(<[_]>::len), Some(2));
        assert!(info.ranges_for("/branches/x").is_none());
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn test_collision_record_serializes_field_names() {
        let record = CollisionRecord {
            revision: 10,
            opnumber: "#1".into(),
            files: vec!["a.txt".into()],
            filecollision: true,
            collideswith: Some(30),
            depth: 0,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["collideswith"], 30);
        assert_eq!(value["filecollision"], true);
        assert!(!record.is_indirect());
    }
}
