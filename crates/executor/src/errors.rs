use catalog::CatalogError;
use thiserror::Error;

/// A statement failed during execution. Always rendered into a [`crate::QueryResult`]
/// message at the executor boundary; execution continues with the next statement.
#[derive(Error, Debug)]
pub enum ExecError {
    /// A schema, catalog, or row-level violation, carrying the original diagnostic.
    #[error("DbRelationError: {0}")]
    Relation(String),
}

impl From<CatalogError> for ExecError {
    fn from(err: CatalogError) -> Self {
        ExecError::Relation(err.to_string())
    }
}
