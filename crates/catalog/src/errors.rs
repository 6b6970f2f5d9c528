use relation::RelationError;
use thiserror::Error;

/// Failures raised by catalog lookups and schema-changing operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No `_columns` rows exist for this table name.
    #[error("table {name} does not exist")]
    UnknownTable { name: String },

    /// `_columns.data_type` held something other than `"INT"` or `"TEXT"`.
    #[error("table {table} column {column} has unrecognized data type {raw}")]
    UnknownDataType {
        table: String,
        column: String,
        raw: String,
    },

    /// `DROP TABLE` was attempted against `_tables` or `_columns`.
    #[error("{name} is a catalog table and cannot be dropped")]
    ProtectedTable { name: String },

    /// Failure from the underlying relation layer.
    #[error(transparent)]
    Relation(#[from] RelationError),
}
