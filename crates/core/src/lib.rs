//! ticketmerge core library.
//!
//! This crate provides the building blocks for checking whether SVN revisions
//! can be merged without dragging in other pending work: configuration,
//! parsers for `svn log -v` and `svn:mergeinfo`, the merge-range filter, the
//! collision engine and report aggregation.

pub mod config;
pub mod errors;
pub mod merge;
pub mod models;
pub mod svn;

// Re-exports for convenience.
pub use config::AppConfig;
pub use merge::{AnalysisOutcome, MergeAnalyzer, MergeRequest};
pub use svn::SvnClient;
