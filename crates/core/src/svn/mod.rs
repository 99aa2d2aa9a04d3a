//! SVN CLI wrapper and parsers for its plain-text output.

pub mod client;
pub mod log;
pub mod mergeinfo;

pub use client::SvnClient;
pub use log::{parse_log, ParsedLog};
pub use mergeinfo::{parse_mergeinfo, ParsedMergeInfo};
