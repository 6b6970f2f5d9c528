//! Small helpers for reading and writing little-endian integers through byte slices,
//! shared by the page and file storage crates.

pub mod bin_error;
pub mod le;
