//! Parser for the `svn:mergeinfo` property.
//!
//! One source path per line, followed by a comma-separated list of revision
//! ranges:
//!
//! ```text
//! /trunk/app:100-150,200,210-230*
//! ```
//!
//! Malformed lines and range tokens are skipped, never fatal.

use tracing::{debug, warn};

use crate::models::{MergeInfo, MergeRange, ParseWarning};

/// Merge info parsed from one property value, plus what had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedMergeInfo {
    pub info: MergeInfo,
    pub warnings: Vec<ParseWarning>,
}

pub fn parse_mergeinfo(text: &str) -> ParsedMergeInfo {
    debug!("parsing svn:mergeinfo ({} bytes)", text.len());
    let mut parsed = ParsedMergeInfo::default();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let Some((path, ranges)) = line.split_once(':') else {
            if !line.trim().is_empty() {
                parsed
                    .warnings
                    .push(ParseWarning::new(line_no, "line has no ':' separator"));
            }
            continue;
        };

        let entry = parsed.info.entry(path.trim());
        for token in ranges.split(',').filter(|t| !t.trim().is_empty()) {
            match parse_range(token) {
                Some(range) => entry.push(range),
                None => {
                    warn!(line = line_no, token = token.trim(), "skipping rest of malformed mergeinfo line");
                    parsed.warnings.push(ParseWarning::new(
                        line_no,
                        format!("malformed range '{}'", token.trim()),
                    ));
                    break;
                }
            }
        }
    }

    debug!(
        sources = parsed.info.len(),
        warnings = parsed.warnings.len(),
        "parsed mergeinfo"
    );
    parsed
}

/// Parse `N`, `N-M` or either with a trailing `*`.
fn parse_range(token: &str) -> Option<MergeRange> {
    let token = token.trim();
    let (token, inheritable) = match token.strip_suffix('*') {
        Some(rest) => (rest, false),
        None => (token, true),
    };

    let mut range = match token.split_once('-') {
        Some((from, to)) => MergeRange::new(from.trim().parse().ok()?, to.trim().parse().ok()?),
        None => MergeRange::single(token.parse().ok()?),
    };
    if range.from > range.to {
        return None;
    }
    range.inheritable = inheritable;
    Some(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_source() {
        let parsed = parse_mergeinfo("/trunk/app: 100-150,200\n");
        assert_eq!(
            parsed.info.ranges_for("/trunk/app").unwrap(),
            &[MergeRange::new(100, 150), MergeRange::single(200)]
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_parse_multiple_sources() {
        let parsed = parse_mergeinfo("/trunk/app:1-5\n/branches/hotfix:7\n");
        assert_eq!(parsed.info.len(), 2);
        assert_eq!(parsed.info.ranges_for("/branches/hotfix").unwrap(), &[MergeRange::single(7)]);
    }

    #[test]
    fn test_repeated_path_appends() {
        let parsed = parse_mergeinfo("/trunk/app:1-5\n/trunk/app:9\n");
        assert_eq!(
            parsed.info.ranges_for("/trunk/app").unwrap(),
            &[MergeRange::new(1, 5), MergeRange::single(9)]
        );
    }

    #[test]
    fn test_non_inheritable_marker() {
        let parsed = parse_mergeinfo("/trunk/app:10-12*,14\n");
        let ranges = parsed.info.ranges_for("/trunk/app").unwrap();
        assert_eq!(ranges.len(), 2);
        assert!(!ranges[0].inheritable);
        assert!(ranges[1].inheritable);
    }

    #[test]
    fn test_malformed_token_skips_rest_of_line() {
        let parsed = parse_mergeinfo("/trunk/app:1-5,x7,9\n/trunk/lib:3\n");
        assert_eq!(parsed.info.ranges_for("/trunk/app").unwrap(), &[MergeRange::new(1, 5)]);
        assert_eq!(parsed.info.ranges_for("/trunk/lib").unwrap(), &[MergeRange::single(3)]);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].location, 1);
    }

    #[test]
    fn test_reversed_range_is_malformed() {
        let parsed = parse_mergeinfo("/trunk/app:9-3\n");
        assert!(parsed.info.ranges_for("/trunk/app").unwrap().is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_lines_without_colon_are_skipped() {
        let parsed = parse_mergeinfo("\ngarbage\n/trunk/app:4\n");
        assert_eq!(parsed.info.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].location, 2);
    }

    #[test]
    fn test_path_with_empty_ranges_still_has_entry() {
        let parsed = parse_mergeinfo("/trunk/app:\n");
        assert_eq!(parsed.info.ranges_for("/trunk/app"), Some(&[][..]));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_mergeinfo("").info.is_empty());
    }
}
