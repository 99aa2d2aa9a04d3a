//! Parsing of revision arguments: `--revisions 8500,8612` and `--range 8000:HEAD`.

use std::fmt;
use std::str::FromStr;

use crate::errors::AnalysisError;

/// Parse one revision number, as given to `--revision`.
pub fn parse_revision(argument: &str, value: &str) -> Result<i64, AnalysisError> {
    let token = value.trim();
    token.parse::<i64>().map_err(|_| AnalysisError::InvalidRevision {
        argument: argument.to_string(),
        token: token.to_string(),
    })
}

/// Parse a comma-separated revision list. Any non-integer token is a hard stop.
pub fn parse_revision_list(argument: &str, value: &str) -> Result<Vec<i64>, AnalysisError> {
    value
        .split(',')
        .map(|token| parse_revision(argument, token))
        .collect()
}

/// One end of a revision range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Number(i64),
    Head,
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Head => write!(f, "HEAD"),
        }
    }
}

/// The `-r from:to` range handed to `svn log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionRange {
    pub from: RangeBound,
    pub to: RangeBound,
}

impl RevisionRange {
    pub fn parse(value: &str) -> Result<Self, AnalysisError> {
        let invalid = || AnalysisError::InvalidRange(value.to_string());
        let (from, to) = value.split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            from: parse_bound(from).ok_or_else(invalid)?,
            to: parse_bound(to).ok_or_else(invalid)?,
        })
    }
}

fn parse_bound(token: &str) -> Option<RangeBound> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("HEAD") {
        return Some(RangeBound::Head);
    }
    token
        .parse::<i64>()
        .ok()
        .filter(|n| *n >= 0)
        .map(RangeBound::Number)
}

impl FromStr for RevisionRange {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_revision_list() {
        assert_eq!(parse_revision_list("--revisions", "8500, 8612,8700").unwrap(), vec![8500, 8612, 8700]);
        assert_eq!(parse_revision_list("--revision", "42").unwrap(), vec![42]);
    }

    #[test]
    fn test_parse_revision_list_rejects_garbage() {
        let err = parse_revision_list("--ignore", "1,r2").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidRevision { ref token, ref argument } if token == "r2" && argument == "--ignore"
        ));
        assert!(parse_revision_list("--revisions", "1,,2").is_err());
        assert!(parse_revision_list("--revisions", "").is_err());
    }

    #[test]
    fn test_parse_range() {
        let range = RevisionRange::parse("8000:9000").unwrap();
        assert_eq!(range.from, RangeBound::Number(8000));
        assert_eq!(range.to, RangeBound::Number(9000));
        assert_eq!(range.to_string(), "8000:9000");

        let range: RevisionRange = "8000:head".parse().unwrap();
        assert_eq!(range.to, RangeBound::Head);
        assert_eq!(range.to_string(), "8000:HEAD");
    }

    #[test]
    fn test_parse_range_rejects_malformed() {
        for bad in ["8000", "8000:", ":9000", "a:b", "-1:5"] {
            assert!(
                matches!(RevisionRange::parse(bad), Err(AnalysisError::InvalidRange(_))),
                "accepted {bad}"
            );
        }
    }
}
