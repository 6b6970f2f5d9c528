//! Row-level access on top of a heap file: marshalling between column-name-keyed
//! rows and their flat byte image, and locating live rows across all of a
//! relation's pages.

mod errors;
mod heap_table;
mod marshal;
mod types;

pub use errors::RelationError;
pub use heap_table::HeapTable;
pub use marshal::{marshal as marshal_row, unmarshal as unmarshal_row, validate};
pub use types::{ColumnAttribute, DataType, Handle, Row, Schema, Value};
