//! Payload handles.
//!
//! A [`PayloadRef`] names the payload of one allocated block within a
//! page: its starting cell offset and its length in cells. It stands in
//! for the raw payload pointer a C allocator would hand out, and doubles
//! as the identity key the mark subsystem is queried with during sweep.

use std::fmt;

/// Page-relative location of an allocated block's payload.
///
/// Offsets and lengths are in cell units. A handle is only meaningful to
/// the page that issued it; it carries no page identity of its own, and
/// it dangles once the owning block is swept or deallocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct PayloadRef {
    /// Cell offset of the first payload cell (one past the header).
    offset: u32,
    /// Payload length in cells, header excluded.
    len: u32,
}

impl PayloadRef {
    /// Create a handle from a payload cell offset and a length in cells.
    pub fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Cell offset of the first payload cell.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Payload length in cells.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this is a header-only block with no payload cells.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for PayloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadRef(off={}, len={})", self.offset, self.len)
    }
}
