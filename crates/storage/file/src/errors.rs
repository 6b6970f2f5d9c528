use std::io;
use std::path::PathBuf;

use page::PageError;
use thiserror::Error;

/// Failures raised while creating, opening, or reading/writing a [`crate::HeapFile`].
#[derive(Error, Debug)]
pub enum FileError {
    /// `create` was called against a path that already has a backing file.
    #[error("heap file already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// A block id was addressed that is beyond the file's current watermark.
    #[error("block {block} does not exist (file has {last} blocks)")]
    BlockOutOfRange { block: u32, last: u32 },

    /// A positional read/write against the backing file failed.
    #[error("I/O error on heap file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes read back from storage did not decode into a valid page.
    #[error(transparent)]
    Page(#[from] PageError),
}
