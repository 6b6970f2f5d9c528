use std::fmt;

use relation::{ColumnAttribute, Value};

/// The outcome of one executed statement: an optional result set plus a one-line
/// human-readable summary.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub column_names: Option<Vec<String>>,
    pub column_attributes: Option<Vec<ColumnAttribute>>,
    pub rows: Option<Vec<Vec<Value>>>,
    pub message: String,
}

impl QueryResult {
    /// A result carrying only a message, with no result set (e.g. CREATE/DROP).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            column_names: None,
            column_attributes: None,
            rows: None,
            message: message.into(),
        }
    }

    /// A result carrying a result set, its column types, and a summary message.
    pub fn rows(
        column_names: Vec<String>,
        column_attributes: Vec<ColumnAttribute>,
        rows: Vec<Vec<Value>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            column_names: Some(column_names),
            column_attributes: Some(column_attributes),
            rows: Some(rows),
            message: message.into(),
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Text(s) => s.clone(),
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(column_names), Some(rows)) = (&self.column_names, &self.rows) {
            writeln!(f, "{}", column_names.join(" | "))?;
            for row in rows {
                let cells: Vec<String> = row.iter().map(cell_text).collect();
                writeln!(f, "{}", cells.join(" | "))?;
            }
        }
        write!(f, "{}", self.message)
    }
}
