use std::collections::HashMap;

use page::{BlockId, RecordId};

/// The declared type of one column: the only two types this storage engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    Text,
}

impl DataType {
    /// Parses the catalog's textual spelling (`"INT"` / `"TEXT"`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "INT" => Some(Self::Int),
            "TEXT" => Some(Self::Text),
            _ => None,
        }
    }

    /// The catalog's textual spelling for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Text => "TEXT",
        }
    }
}

/// The type attribute of one declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAttribute {
    pub data_type: DataType,
}

/// A value stored in one cell of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Text(String),
}

/// A row as a column-name-keyed dictionary. Insertion order is irrelevant; the
/// owning relation's declared column order is authoritative for marshalling.
pub type Row = HashMap<String, Value>;

/// The ordered schema of one relation: its name plus its declared columns.
#[derive(Debug, Clone)]
pub struct Schema {
    pub table_name: String,
    pub columns: Vec<(String, ColumnAttribute)>,
}

impl Schema {
    pub fn new(table_name: impl Into<String>, columns: Vec<(String, ColumnAttribute)>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn attribute(&self, column: &str) -> Option<ColumnAttribute> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, attr)| *attr)
    }
}

/// Uniquely identifies one row within one relation: the page it lives on, and its
/// record id within that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub block_id: BlockId,
    pub record_id: RecordId,
}

impl Handle {
    pub fn new(block_id: BlockId, record_id: RecordId) -> Self {
        Self {
            block_id,
            record_id,
        }
    }
}
