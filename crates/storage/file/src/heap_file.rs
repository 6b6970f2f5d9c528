use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::FileExt;
#[cfg(windows)]
use std::os::windows::fs::FileExt;

use page::{BlockId, PAGE_SIZE, SlottedPage};

use crate::errors::FileError;

/// An ordered sequence of fixed-size pages, keyed by 1-based [`BlockId`], persisted as
/// a single file on disk. Each relation owns exactly one `HeapFile`.
#[derive(Debug)]
pub struct HeapFile {
    path: PathBuf,
    handle: File,
    last_block: u32,
}

impl HeapFile {
    /// Creates a brand-new backing file. Fails if one already exists at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref().to_path_buf();
        let handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::AlreadyExists {
                    FileError::AlreadyExists { path: path.clone() }
                } else {
                    FileError::Io {
                        path: path.clone(),
                        source,
                    }
                }
            })?;
        let mut file = Self {
            path,
            handle,
            last_block: 0,
        };
        file.get_new()?;
        Ok(file)
    }

    /// Creates the backing file, or opens it if it already exists.
    pub fn create_if_not_exists(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        match Self::create(path) {
            Ok(file) => Ok(file),
            Err(FileError::AlreadyExists { .. }) => Self::open(path),
            Err(other) => Err(other),
        }
    }

    /// Opens an existing backing file, recovering the block watermark from its length.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref().to_path_buf();
        let handle = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| FileError::Io {
                path: path.clone(),
                source,
            })?;
        let len = handle
            .metadata()
            .map_err(|source| FileError::Io {
                path: path.clone(),
                source,
            })?
            .len();
        let last_block = (len / PAGE_SIZE as u64) as u32;
        Ok(Self {
            path,
            handle,
            last_block,
        })
    }

    /// Closes the backing file handle. A no-op beyond letting `self` drop; kept as an
    /// explicit call so callers can sequence it against other relation lifecycle steps.
    pub fn close(self) -> Result<(), FileError> {
        drop(self);
        Ok(())
    }

    /// Closes and deletes the backing file.
    pub fn drop_file(self) -> Result<(), FileError> {
        let path = self.path.clone();
        drop(self);
        std::fs::remove_file(&path).map_err(|source| FileError::Io { path, source })
    }

    /// Appends a new block initialized as an empty page and returns it.
    pub fn get_new(&mut self) -> Result<SlottedPage, FileError> {
        let block_id = BlockId::new(self.last_block + 1);
        let page = SlottedPage::new(block_id);
        let offset = (block_id.number() as u64 - 1) * PAGE_SIZE as u64;
        self.write_at(page.as_bytes(), offset)?;
        self.last_block = block_id.number();
        Ok(page)
    }

    /// Reads back the page stored at `block_id`.
    pub fn get(&self, block_id: BlockId) -> Result<SlottedPage, FileError> {
        if block_id.number() > self.last_block {
            return Err(FileError::BlockOutOfRange {
                block: block_id.number(),
                last: self.last_block,
            });
        }
        let mut buf = [0u8; PAGE_SIZE];
        let offset = (block_id.number() as u64 - 1) * PAGE_SIZE as u64;
        self.read_at(&mut buf, offset)?;
        Ok(SlottedPage::from_bytes(block_id, Box::new(buf))?)
    }

    /// Writes `page`'s buffer back under its own block id.
    pub fn put(&self, page: &SlottedPage) -> Result<(), FileError> {
        let offset = (page.block_id().number() as u64 - 1) * PAGE_SIZE as u64;
        self.write_at(page.as_bytes(), offset)
    }

    /// All block ids currently allocated, in order.
    pub fn block_ids(&self) -> Vec<BlockId> {
        (1..=self.last_block).map(BlockId::new).collect()
    }

    /// The highest allocated block id, if any blocks exist.
    pub fn last_block_id(&self) -> Option<BlockId> {
        (self.last_block > 0).then(|| BlockId::new(self.last_block))
    }

    /// Reads exactly `buf.len()` bytes starting at `offset`, looping over short reads
    /// the way the platform's positional read primitive may return them (Unix
    /// `read_at`, Windows `seek_read`).
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<(), FileError> {
        let mut read = 0;
        while read < buf.len() {
            let n = Self::positional_read(&self.handle, &mut buf[read..], offset + read as u64)
                .map_err(|source| FileError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            if n == 0 {
                return Err(FileError::Io {
                    path: self.path.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
                });
            }
            read += n;
        }
        Ok(())
    }

    /// Writes all of `buf` starting at `offset`, looping over short writes the way the
    /// platform's positional write primitive may return them.
    fn write_at(&self, buf: &[u8], offset: u64) -> Result<(), FileError> {
        let mut written = 0;
        while written < buf.len() {
            let n = Self::positional_write(&self.handle, &buf[written..], offset + written as u64)
                .map_err(|source| FileError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            if n == 0 {
                return Err(FileError::Io {
                    path: self.path.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::WriteZero),
                });
            }
            written += n;
        }
        Ok(())
    }

    #[cfg(unix)]
    fn positional_read(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        file.read_at(buf, offset)
    }

    #[cfg(windows)]
    fn positional_read(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        file.seek_read(buf, offset)
    }

    #[cfg(unix)]
    fn positional_write(file: &File, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        file.write_at(buf, offset)
    }

    #[cfg(windows)]
    fn positional_write(file: &File, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        file.seek_write(buf, offset)
    }
}
