//! Terminal styling for the merge check report.

use console::Style;

/// Width of the report's divider lines.
const RULE_WIDTH: usize = 63;

fn marked(mark: &str, style: Style, msg: &str) -> String {
    format!("{} {}", style.apply_to(mark), msg)
}

/// "Merge can be performed" style outcome, with a green check mark.
pub fn success(msg: &str) -> String {
    marked("✓", Style::new().green(), msg)
}

/// Hard stop or failed command, with a red cross.
pub fn error(msg: &str) -> String {
    marked("✗", Style::new().red(), msg)
}

/// Requested revision that was skipped (missing or already merged).
pub fn warn(msg: &str) -> String {
    marked("⚠", Style::new().yellow(), msg)
}

/// Report headline, in bold.
pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

/// Ticket label in the per-ticket summary.
pub fn ticket(label: &str) -> String {
    Style::new().cyan().bold().apply_to(label).to_string()
}

/// Dimmed divider made of `ch`.
pub fn rule(ch: char) -> String {
    dim(&ch.to_string().repeat(RULE_WIDTH))
}
