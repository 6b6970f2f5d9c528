//! The self-describing schema catalog: `_tables` and `_columns`, two heap relations
//! that describe every table in the database, including themselves.

mod errors;
mod tables;

pub use errors::CatalogError;
pub use tables::Tables;
