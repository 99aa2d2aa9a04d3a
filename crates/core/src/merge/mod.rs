//! Merge collision analysis.
//!
//! The pipeline for one merge check:
//! 1. **Filtering** -- dropping commits `svn:mergeinfo` already records as merged.
//! 2. **Collision detection** -- the transitive closure of commits a merge drags in.
//! 3. **Reporting** -- grouping collisions by ticket for the operator.

pub mod analysis;
pub mod collision;
pub mod filter;
pub mod ignore;
pub mod report;
pub mod revisions;

pub use analysis::{AnalysisOutcome, MergeAnalysis, MergeAnalyzer, MergeRequest};
pub use collision::CollisionEngine;
pub use filter::{filter_merged, find_range_position};
pub use ignore::IgnorePolicy;
pub use report::{CollisionReport, TicketGroup};
pub use revisions::{parse_revision, parse_revision_list, RangeBound, RevisionRange};
