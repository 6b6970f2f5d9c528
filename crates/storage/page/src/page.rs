use crate::BlockId;
use crate::errors::PageError;
use crate::header::{EntryMut, EntryRef, entry_range};

/// Fixed size of every page buffer in bytes.
pub const PAGE_SIZE: usize = 4096;

/// A 1-based identifier for a record's header slot within its page. Stable for the
/// life of the page: once assigned it is never reused, even after the slot is
/// tombstoned by [`SlottedPage::del`].
pub type RecordId = u32;

/// A single fixed-size page: a header of `(size, offset)` entries packed upward from
/// offset 0, and record bytes packed downward from the end of the buffer.
///
/// Entry 0 is reserved for page-level state, `(num_records, end_free)`, and is
/// rewritten on every mutation. [`SlottedPage`] owns its buffer; callers that read a
/// page from storage and mutate it are responsible for writing it back.
#[derive(Debug)]
pub struct SlottedPage {
    block_id: BlockId,
    data: Box<[u8; PAGE_SIZE]>,
    num_records: u16,
    end_free: u16,
}

impl SlottedPage {
    /// Builds a brand-new, empty page over a zero-filled buffer.
    pub fn new(block_id: BlockId) -> Self {
        let data = Box::new([0u8; PAGE_SIZE]);
        let mut page = Self {
            block_id,
            data,
            num_records: 0,
            end_free: (PAGE_SIZE - 1) as u16,
        };
        page.write_entry0()
            .expect("entry 0 is always in bounds of a fresh page");
        page
    }

    /// Materializes a page over bytes already on disk, recovering `num_records` and
    /// `end_free` from header entry 0.
    pub fn from_bytes(block_id: BlockId, data: Box<[u8; PAGE_SIZE]>) -> Result<Self, PageError> {
        let mut page = Self {
            block_id,
            data,
            num_records: 0,
            end_free: 0,
        };
        let (num_records, end_free) = page.read_entry(0)?;
        page.num_records = num_records;
        page.end_free = end_free;
        Ok(page)
    }

    /// Constructs either a fresh or an existing page depending on `is_new`, mirroring
    /// the public `construct(buffer, block_id, is_new)` contract.
    pub fn construct(
        block_id: BlockId,
        data: Box<[u8; PAGE_SIZE]>,
        is_new: bool,
    ) -> Result<Self, PageError> {
        if is_new {
            Ok(Self::new(block_id))
        } else {
            Self::from_bytes(block_id, data)
        }
    }

    /// The block this page is, or will be, stored under.
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    /// The number of header entries ever allocated on this page, live or tombstoned.
    pub fn num_records(&self) -> u16 {
        self.num_records
    }

    /// Borrows the raw page buffer, ready to be written back to the backing store.
    pub fn as_bytes(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    /// Reports whether `need` additional bytes of record/header space are available.
    ///
    /// Free bytes = `E − (N + 2)·4`; the `+2` reserves room for entry 0 and one
    /// prospective new header entry.
    pub fn has_room(&self, need: usize) -> bool {
        let reserved = (self.num_records as i64 + 2) * 4;
        let free = self.end_free as i64 - reserved;
        free >= 0 && need as i64 <= free
    }

    /// Appends `bytes` as a new record, returning its freshly assigned id.
    pub fn add(&mut self, bytes: &[u8]) -> Result<RecordId, PageError> {
        let needed = bytes.len() + 4;
        if !self.has_room(needed) {
            return Err(PageError::NoRoom {
                needed,
                free: self.free_bytes(),
            });
        }
        let offset = self.end_free - bytes.len() as u16;
        self.data[(offset as usize + 1)..(offset as usize + 1 + bytes.len())]
            .copy_from_slice(bytes);
        self.end_free = offset;
        self.num_records += 1;
        let rid = self.num_records as RecordId;
        self.write_entry(rid, bytes.len() as u16, offset + 1)?;
        self.write_entry0()?;
        Ok(rid)
    }

    /// Reads the bytes stored under `rid`, or `None` if the slot is a tombstone.
    pub fn get(&self, rid: RecordId) -> Result<Option<Vec<u8>>, PageError> {
        self.check_rid(rid)?;
        let (size, offset) = self.read_entry(rid)?;
        if size == 0 && offset == 0 {
            return Ok(None);
        }
        Ok(Some(
            self.data[offset as usize..offset as usize + size as usize].to_vec(),
        ))
    }

    /// Replaces the bytes stored under a live `rid`, compacting the page as needed.
    pub fn put(&mut self, rid: RecordId, bytes: &[u8]) -> Result<(), PageError> {
        self.check_rid(rid)?;
        let (size, offset) = self.read_entry(rid)?;
        if size == 0 && offset == 0 {
            return Err(PageError::AlreadyDeleted { rid });
        }
        let new_len = bytes.len() as u16;
        if new_len > size {
            let growth = (new_len - size) as usize;
            if !self.has_room(growth) {
                return Err(PageError::NoRoom {
                    needed: growth,
                    free: self.free_bytes(),
                });
            }
            let new_offset = offset - (new_len - size);
            self.slide(offset, new_offset)?;
            self.data[new_offset as usize..new_offset as usize + new_len as usize]
                .copy_from_slice(bytes);
        } else {
            self.data[offset as usize..offset as usize + new_len as usize].copy_from_slice(bytes);
            self.slide(offset + new_len, offset + size)?;
        }
        let (_, current_offset) = self.read_entry(rid)?;
        self.write_entry(rid, new_len, current_offset)?;
        self.write_entry0()?;
        Ok(())
    }

    /// Tombstones a live `rid` and reclaims its bytes by compacting the page.
    pub fn del(&mut self, rid: RecordId) -> Result<(), PageError> {
        self.check_rid(rid)?;
        let (size, offset) = self.read_entry(rid)?;
        if size == 0 && offset == 0 {
            return Err(PageError::AlreadyDeleted { rid });
        }
        self.write_entry(rid, 0, 0)?;
        self.slide(offset, offset + size)?;
        self.write_entry0()?;
        Ok(())
    }

    /// Returns every live record id, in ascending order.
    pub fn ids(&self) -> Result<Vec<RecordId>, PageError> {
        let mut live = Vec::new();
        for rid in 1..=self.num_records as RecordId {
            let (size, _) = self.read_entry(rid)?;
            if size > 0 {
                live.push(rid);
            }
        }
        Ok(live)
    }

    fn free_bytes(&self) -> usize {
        let reserved = (self.num_records as i64 + 2) * 4;
        (self.end_free as i64 - reserved).max(0) as usize
    }

    fn check_rid(&self, rid: RecordId) -> Result<(), PageError> {
        if rid == 0 || rid > self.num_records as RecordId {
            return Err(PageError::InvalidRecordId {
                rid,
                num_records: self.num_records,
            });
        }
        Ok(())
    }

    fn read_entry(&self, index: u32) -> Result<(u16, u16), PageError> {
        let range = entry_range(index);
        let view = EntryRef::new(&self.data[range]);
        Ok((view.first()?, view.second()?))
    }

    fn write_entry(&mut self, index: u32, first: u16, second: u16) -> Result<(), PageError> {
        let range = entry_range(index);
        let mut view = EntryMut::new(&mut self.data[range]);
        view.set(first, second)
    }

    fn write_entry0(&mut self) -> Result<(), PageError> {
        self.write_entry(0, self.num_records, self.end_free)
    }

    /// Shifts the live byte range `[E+1, start)` by `end − start`, updating every
    /// live header entry whose offset is `≤ start` and the cached `end_free`.
    fn slide(&mut self, start: u16, end: u16) -> Result<(), PageError> {
        let shift = end as i32 - start as i32;
        if shift == 0 {
            return Ok(());
        }
        let region_start = self.end_free as usize + 1;
        let region_end = start as usize;
        if region_end > region_start {
            let new_start = (region_start as i32 + shift) as usize;
            self.data.copy_within(region_start..region_end, new_start);
        }
        for rid in 1..=self.num_records as RecordId {
            let (size, offset) = self.read_entry(rid)?;
            if size == 0 && offset == 0 {
                continue;
            }
            if offset as i32 <= start as i32 {
                let new_offset = (offset as i32 + shift) as u16;
                self.write_entry(rid, size, new_offset)?;
            }
        }
        self.end_free = (self.end_free as i32 + shift) as u16;
        Ok(())
    }
}
