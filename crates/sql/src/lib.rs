//! A minimal statement parser covering exactly the SQL surface this engine
//! understands: `CREATE TABLE`, `DROP TABLE`, `SHOW TABLES`, `SHOW COLUMNS FROM`.

mod errors;
mod parser;
mod statement;

pub use errors::ParseError;
pub use parser::parse;
pub use statement::{ColumnDef, ColumnType, Statement};
