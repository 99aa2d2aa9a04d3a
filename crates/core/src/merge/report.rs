//! Grouping and text rendering of collision records.
//!
//! Groups are keyed by ticket in order of first appearance; inside a group
//! records are sorted by revision. The detail listing keeps discovery order.

use serde::Serialize;

use crate::models::CollisionRecord;

/// All collisions of one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketGroup {
    pub opnumber: String,
    pub records: Vec<CollisionRecord>,
}

impl TicketGroup {
    pub fn revisions(&self) -> impl Iterator<Item = i64> + '_ {
        self.records.iter().map(|r| r.revision)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollisionReport {
    pub groups: Vec<TicketGroup>,
    /// Records in discovery order, for the detailed file listing.
    #[serde(skip)]
    pub records: Vec<CollisionRecord>,
}

impl CollisionReport {
    pub fn from_records(records: &[CollisionRecord]) -> Self {
        let mut groups: Vec<TicketGroup> = Vec::new();
        for record in records {
            match groups.iter_mut().find(|g| g.opnumber == record.opnumber) {
                Some(group) => group.records.push(record.clone()),
                None => groups.push(TicketGroup {
                    opnumber: record.opnumber.clone(),
                    records: vec![record.clone()],
                }),
            }
        }
        for group in &mut groups {
            group.records.sort_by_key(|r| r.revision);
        }
        Self {
            groups,
            records: records.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `8612/8700 - 8500(#1234), 8550/8551(HOTFIX)`
    pub fn one_liner(&self, checked: &[i64]) -> String {
        let groups: Vec<String> = self
            .groups
            .iter()
            .map(|g| format!("{}({})", join(g.revisions(), "/"), g.opnumber))
            .collect();
        format!("{} - {}", join(checked.iter().copied(), "/"), groups.join(", "))
    }

    /// Headline plus one block of revisions per ticket. `single` selects the
    /// `--revision` wording.
    pub fn summary_lines(&self, checked: &[i64], single: bool) -> Vec<String> {
        let checked_list = join(checked.iter().copied(), ", ");
        let mut lines = vec![if single {
            format!("Revision [{}] collides with the following commits:", checked_list)
        } else {
            format!(
                "Provided revisions [{}] collide with the following commits:",
                checked_list
            )
        }];
        for group in &self.groups {
            lines.push(format!(" * Task [{}] collisions:", group.opnumber));
            for revision in group.revisions() {
                lines.push(format!("   * Revision: [{}]", revision));
            }
            lines.push(String::new());
        }
        lines
    }

    /// Per-record explanation of why it collides and through which files.
    pub fn detail_lines(&self) -> Vec<Vec<String>> {
        self.records.iter().map(describe).collect()
    }
}

fn describe(record: &CollisionRecord) -> Vec<String> {
    if !record.filecollision {
        return vec![format!(
            "Revision [{}] has no colliding files but references Task [{}]",
            record.revision, record.opnumber
        )];
    }

    let via = record
        .collideswith
        .map(|r| r.to_string())
        .unwrap_or_default();
    let reason = if record.is_indirect() {
        format!("indirectly via revision [{}]", via)
    } else {
        format!("directly with revision [{}]", via)
    };
    let mut lines = vec![
        format!(
            "Revision: [{}] for task: [{}] collides {}",
            record.revision, record.opnumber, reason
        ),
        "Files:".to_string(),
    ];
    lines.extend(record.files.iter().map(|f| format!(">> {}", f)));
    lines
}

fn join<I: Iterator<Item = i64>>(revisions: I, separator: &str) -> String {
    revisions
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
