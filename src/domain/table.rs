//! Fixed-width table rendering of envelope records

use serde_json::Value;

use crate::domain::catalog::canonical_command_name;
use crate::domain::envelope::{Record, ResponseEnvelope};

/// Width of every table column, leading space included.
pub const COLUMN_WIDTH: usize = 20;

/// Column separator following each cell.
pub const SEPARATOR: char = '|';

const REGION_COLUMNS: [&str; 5] = ["name", "type", "groups", "entryCount", "regionAttributes"];
const MEMBER_COLUMNS: [&str; 4] = ["id", "host", "status", "pid"];

/// Command kinds with a known table layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    ListRegions,
    ListMembers,
    Other(String),
}

impl CommandKind {
    /// Classify a command name or phrase.
    pub fn from_command(command: &str) -> Self {
        match canonical_command_name(command).as_str() {
            "list-regions" => CommandKind::ListRegions,
            "list-members" => CommandKind::ListMembers,
            other => CommandKind::Other(other.to_string()),
        }
    }

    /// Ordered table headers; empty for unknown kinds.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            CommandKind::ListRegions => &REGION_COLUMNS,
            CommandKind::ListMembers => &MEMBER_COLUMNS,
            CommandKind::Other(_) => &[],
        }
    }

    pub fn has_table_layout(&self) -> bool {
        !self.columns().is_empty()
    }

    /// Label of the record count line.
    pub fn summary_label(&self) -> Option<&'static str> {
        match self {
            CommandKind::ListRegions => Some("Number of Regions"),
            CommandKind::ListMembers => Some("Number of Members"),
            CommandKind::Other(_) => None,
        }
    }
}

/// Fit `value` into a column of `width` characters.
///
/// The cell starts with one space. Values longer than `width - 1` characters
/// are cut to `width - 1`; shorter values are right-padded with `filler`.
pub fn pad(value: &str, width: usize, filler: char) -> String {
    let room = width.saturating_sub(1);
    let mut cell = String::with_capacity(width);
    cell.push(' ');
    let mut used = 0;
    for c in value.chars().take(room) {
        cell.push(c);
        used += 1;
    }
    cell.extend(std::iter::repeat(filler).take(room - used));
    cell
}

/// Text shown for a record value.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                format!("{:.0}", n.as_f64().unwrap_or_default())
            }
        }
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => {
            let items: Vec<String> = items.iter().map(|i| cell_text(Some(i))).collect();
            format!("[{}]", items.join(", "))
        }
        Some(object @ Value::Object(_)) => object.to_string(),
    }
}

/// One table row for `record`, without a line break.
pub fn render_row(record: &Record, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|column| {
            let mut cell = pad(&cell_text(record.get(*column)), COLUMN_WIDTH, ' ');
            cell.push(SEPARATOR);
            cell
        })
        .collect()
}

/// Render the envelope as a status preamble, a table and a summary line.
pub fn render_table(envelope: &ResponseEnvelope, kind: &CommandKind) -> String {
    let columns = kind.columns();

    let mut out = format!("Status Code: {}\n", envelope.status_code);
    if let Some(message) = envelope.status_message.as_deref().filter(|m| !m.is_empty()) {
        out.push_str(&format!("Status Message: {message}\n"));
    }
    out.push('\n');

    for column in columns {
        out.push_str(&pad(column, COLUMN_WIDTH, ' '));
        out.push(SEPARATOR);
    }
    out.push('\n');
    out.push_str(&pad("", COLUMN_WIDTH * columns.len() + 5, '-'));
    out.push('\n');

    for record in &envelope.result {
        out.push_str(&render_row(record, columns));
        out.push('\n');
    }

    if let Some(label) = kind.summary_label() {
        out.push_str(&format!("\n{}: {}", label, envelope.result.len()));
    }
    out
}
