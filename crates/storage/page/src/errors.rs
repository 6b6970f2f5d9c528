use binary_helpers::bin_error::BinaryError;
use thiserror::Error;

/// Failures reported by [`crate::SlottedPage`] operations.
///
/// `NoRoom` is the only recoverable case: callers are expected to retry the operation
/// against a different page. Every other variant indicates the caller violated a
/// precondition (an out-of-range or already-deleted record id) and is not something a
/// well-behaved caller should ever trigger in practice.
#[derive(Error, Debug)]
pub enum PageError {
    /// The page does not have `needed` contiguous free bytes to satisfy the request.
    #[error("page has no room: needed {needed} bytes, {free} free")]
    NoRoom { needed: usize, free: usize },

    /// `rid` is zero or greater than the number of header entries the page has ever allocated.
    #[error("record id {rid} is out of range for a page with {num_records} records")]
    InvalidRecordId { rid: u32, num_records: u16 },

    /// The caller addressed a record id whose slot has already been tombstoned.
    #[error("record id {rid} was already deleted")]
    AlreadyDeleted { rid: u32 },

    /// A header entry could not be read or written at its expected offset.
    #[error("corrupt page header")]
    Header(#[from] BinaryError),
}
