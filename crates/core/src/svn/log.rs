//! Parser for the plain-text output of `svn log -v`.
//!
//! ```text
//! ------------------------------------------------------------------------
//! r1204 | jdoe | 2024-03-01 10:12:44 +0100 (Fri, 01 Mar 2024) | 1 line
//! Changed paths:
//!    M /trunk/app/src/Order.java
//!
//! [Orders] (OP 1234) round totals before tax
//! ------------------------------------------------------------------------
//! ```
//!
//! Parsing is best-effort: a block with a malformed header is dropped and the
//! rest of the log is still parsed. Every anomaly is reported as a
//! [`ParseWarning`].

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::models::{Commit, ParseWarning};

/// Minimum number of dashes on a block divider line.
const DIVIDER_MIN_LEN: usize = 10;

/// Action codes `svn log -v` prints in front of changed paths.
const ACTION_CODES: [char; 7] = ['A', 'D', 'U', 'M', 'G', 'E', 'R'];

/// Commits parsed from one log, plus whatever the parser had to skip.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub commits: Vec<Commit>,
    pub warnings: Vec<ParseWarning>,
}

/// `[Component] (OP 1234)` style ticket reference.
fn op_ticket_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\[.*\]\s*\(\s*OP\s*(\d+)\)").expect("ticket pattern is valid")
    })
}

/// `[Component] (WORD)` style ticket reference. `\w` covers non-ASCII letters.
fn word_ticket_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\[.*\]\s*\(\s*(\w+)\)").expect("ticket pattern is valid")
    })
}

/// Parse the text of `svn log -v` into commits, in the order the blocks appear.
pub fn parse_log(text: &str) -> ParsedLog {
    debug!("parsing svn log ({} bytes)", text.len());
    let mut parsed = ParsedLog::default();

    for (index, block) in split_blocks(text).iter().enumerate() {
        if let Some(commit) = parse_block(index + 1, block, &mut parsed.warnings) {
            parsed.commits.push(commit);
        }
    }

    debug!(
        count = parsed.commits.len(),
        warnings = parsed.warnings.len(),
        "parsed svn log entries"
    );
    parsed
}

fn is_divider(line: &str) -> bool {
    let line = line.trim();
    line.len() >= DIVIDER_MIN_LEN && line.chars().all(|c| c == '-')
}

/// Split the log into blocks of lines, dropping dividers and blank blocks.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if is_divider(line) {
            push_block(&mut blocks, std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, current);
    blocks
}

fn push_block<'a>(blocks: &mut Vec<Vec<&'a str>>, mut lines: Vec<&'a str>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading);
    if !lines.is_empty() {
        blocks.push(lines);
    }
}

fn parse_block(block_no: usize, lines: &[&str], warnings: &mut Vec<ParseWarning>) -> Option<Commit> {
    let (header, rest) = lines.split_first()?;
    let fields: Vec<&str> = header.trim().split('|').map(str::trim).collect();

    let revision = match parse_revision_field(fields[0]) {
        Some(rev) => rev,
        None => {
            warn!(block = block_no, header = %header, "skipping svn log block with unparseable revision");
            warnings.push(ParseWarning::new(
                block_no,
                format!("unparseable revision in header '{}'", header.trim()),
            ));
            return None;
        }
    };

    let mut commit = Commit::new(revision);
    commit.user = fields.get(1).map(|s| s.to_string()).unwrap_or_default();
    commit.timestamp = fields.get(2).map(|s| s.to_string()).unwrap_or_default();
    commit.lines = fields.get(3).map(|s| s.to_string()).unwrap_or_default();
    if fields.len() < 4 {
        warnings.push(ParseWarning::new(
            block_no,
            format!("r{} header has {} of 4 fields", revision, fields.len()),
        ));
    }

    let mut comment_pending = false;
    let mut comment_lines: Vec<&str> = Vec::new();

    for line in rest {
        let entry = line.trim();

        if entry.is_empty() {
            comment_pending = true;
        } else if comment_pending {
            comment_lines.push(entry);
            if comment_lines.len() == 1 {
                if let Some(caps) = op_ticket_pattern().captures(entry) {
                    commit.opnumber = format!("#{}", &caps[1]);
                    break;
                }
                if let Some(caps) = word_ticket_pattern().captures(entry) {
                    commit.opnumber = caps[1].to_string();
                }
            }
        } else if let Some(path) = changed_path(entry) {
            commit.files.push(path.to_string());
        }
    }

    commit.comment = comment_lines.join("\n");
    Some(commit)
}

/// Strip the one-character revision marker (`r`) and parse the number.
fn parse_revision_field(field: &str) -> Option<i64> {
    let mut chars = field.chars();
    chars.next()?;
    chars.as_str().trim().parse::<i64>().ok()
}

/// The path of a `M /trunk/x` style line, without any `(from ...)` suffix.
fn changed_path(entry: &str) -> Option<&str> {
    let mut chars = entry.chars();
    let action = chars.next()?;
    if !ACTION_CODES.contains(&action) || chars.next() != Some(' ') {
        return None;
    }
    let path = entry[2..].trim();
    let path = match path.rfind(" (from ") {
        Some(pos) if path.ends_with(')') => path[..pos].trim_end(),
        _ => path,
    };
    Some(path)
}
