//! Transitive collision detection between pending commits.
//!
//! Two commits collide when they touch a common (non-ignored) file, or when
//! the candidate's ticket has already been recorded as colliding anywhere in
//! the run. Starting from each checked revision, every older pending commit is
//! compared against it; each newly found collision is itself expanded at the
//! next depth until nothing new turns up.
//!
//! The expansion uses an explicit LIFO worklist that visits revisions in the
//! same pre-order a recursive walk would: the collisions discovered by one
//! target are expanded, in discovery order, before that target's siblings.
//! Record order and ticket bookkeeping match the recursive form.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::merge::ignore::IgnorePolicy;
use crate::models::{Commit, CollisionRecord};

/// Run-wide collision state. Only ever grows.
#[derive(Debug, Clone, Default)]
struct CollisionSet {
    contains: HashSet<i64>,
    opnumbers: HashSet<String>,
    items: Vec<CollisionRecord>,
}

impl CollisionSet {
    fn contains(&self, revision: i64) -> bool {
        self.contains.contains(&revision)
    }

    fn has_opnumber(&self, opnumber: &str) -> bool {
        self.opnumbers.contains(opnumber)
    }

    fn record(&mut self, record: CollisionRecord) {
        self.contains.insert(record.revision);
        self.opnumbers.insert(record.opnumber.clone());
        self.items.push(record);
    }
}

/// Collision engine over one filtered, ascending commit sequence.
pub struct CollisionEngine<'a> {
    commits: &'a [Commit],
    ignore: &'a IgnorePolicy,
    state: CollisionSet,
}

impl<'a> CollisionEngine<'a> {
    pub fn new(commits: &'a [Commit], ignore: &'a IgnorePolicy) -> Self {
        Self {
            commits,
            ignore,
            state: CollisionSet::default(),
        }
    }

    /// Find everything `revision` collides with, directly or transitively.
    ///
    /// A revision that is not pending, or is the oldest pending commit, has
    /// nothing before it to collide with and is a no-op.
    pub fn check(&mut self, revision: i64) {
        let before = self.state.items.len();
        let mut worklist: Vec<(i64, u32)> = vec![(revision, 0)];

        while let Some((target, depth)) = worklist.pop() {
            let found = self.scan(target, depth);
            worklist.extend(found.into_iter().rev().map(|rev| (rev, depth + 1)));
        }

        debug!(
            revision,
            found = self.state.items.len() - before,
            total = self.state.items.len(),
            "collision check complete"
        );
    }

    /// Compare every commit before `target` with it; record and return the
    /// revisions that newly collide.
    fn scan(&mut self, target: i64, depth: u32) -> Vec<i64> {
        let commits = self.commits;
        let position = match commits.iter().position(|c| c.revision == target) {
            Some(0) | None => return Vec::new(),
            Some(p) => p,
        };
        let target_files: HashSet<&str> = commits[position].files.iter().map(String::as_str).collect();

        let mut found = Vec::new();
        for candidate in &commits[..position] {
            if self.ignore.is_revision_ignored(candidate.revision) {
                continue;
            }

            let files: Vec<String> = candidate
                .files
                .iter()
                .filter(|f| !self.ignore.is_file_ignored(f) && target_files.contains(f.as_str()))
                .cloned()
                .collect();
            let file_collision = !files.is_empty();
            let ticket_collision = self.state.has_opnumber(&candidate.opnumber);

            if (file_collision || ticket_collision) && !self.state.contains(candidate.revision) {
                trace!(
                    revision = candidate.revision,
                    target,
                    depth,
                    file_collision,
                    ticket = %candidate.opnumber,
                    "collision"
                );
                self.state.record(CollisionRecord {
                    revision: candidate.revision,
                    opnumber: candidate.opnumber.clone(),
                    files,
                    filecollision: file_collision,
                    collideswith: file_collision.then_some(target),
                    depth,
                });
                found.push(candidate.revision);
            }
        }
        found
    }

    /// Consume the engine, returning the records in discovery order.
    pub fn finish(self) -> Vec<CollisionRecord> {
        self.state.items
    }
}
