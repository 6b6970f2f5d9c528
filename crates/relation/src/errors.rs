use binary_helpers::bin_error::BinaryError;
use file::FileError;
use page::PageError;
use thiserror::Error;

use crate::types::Handle;

/// Schema, catalog, or row-level violations raised by a [`crate::HeapTable`].
///
/// Callers at the executor boundary render these with the `"DbRelationError: "` prefix.
#[derive(Error, Debug)]
pub enum RelationError {
    /// `validate` found no value for a declared column; null/default values are not supported.
    #[error("null/defaults not supported: column {column} has no value")]
    MissingColumn { column: String },

    /// A column's declared type cannot be marshalled (only INT and TEXT are supported).
    #[error("unsupported column type for column {column}")]
    UnsupportedType { column: String },

    /// `project`, `del`, or `update` addressed a handle whose slot is a tombstone.
    #[error("handle {handle:?} points at a deleted row")]
    Tombstone { handle: Handle },

    /// A table with this name already has a backing file.
    #[error("table {table} already exists")]
    TableAlreadyExists { table: String },

    /// Failure from the underlying heap file.
    #[error(transparent)]
    File(#[from] FileError),

    /// A page-level failure that survived every `NoRoom` fallback (e.g. a record too
    /// large to fit on an otherwise-empty page).
    #[error(transparent)]
    Page(#[from] PageError),

    /// Failure decoding a marshalled row.
    #[error(transparent)]
    Binary(#[from] BinaryError),
}
