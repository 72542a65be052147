//! Block headers and the page's backing cell array.
//!
//! One cell is a `u64` word. A block's first cell is its header: the low
//! 32 bits hold the block size in cells (header included), one flag bit
//! holds the allocation state. The remaining `size - 1` cells of the block
//! are payload. The all-zero word decodes as a free header of size 0, so a
//! freshly zeroed array is valid sentinel territory before real headers
//! are written.

use std::fmt;

/// Flag bit in a header word marking the block allocated.
const ALLOCATED_BIT: u64 = 1 << 32;

/// Decoded block header: size in cells (its own header cell included)
/// plus the allocated flag.
///
/// A `Cell` is a plain value decoded from and encoded into one storage
/// word; mutating it does nothing until it is written back via
/// [`CellArray::set_header`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Block length in cells, counting this header cell.
    pub size: u32,
    /// Whether the block is currently allocated.
    pub allocated: bool,
}

impl Cell {
    /// A free header of the given size.
    pub fn free(size: u32) -> Self {
        Self {
            size,
            allocated: false,
        }
    }

    /// Decode a header from its storage word.
    pub fn from_word(word: u64) -> Self {
        Self {
            size: word as u32,
            allocated: word & ALLOCATED_BIT != 0,
        }
    }

    /// Encode this header into its storage word.
    pub fn to_word(self) -> u64 {
        let mut word = u64::from(self.size);
        if self.allocated {
            word |= ALLOCATED_BIT;
        }
        word
    }

    /// Offset of the next block in the chain, given this block's offset.
    ///
    /// Pure arithmetic; the result is one past the page end for the last
    /// block of a well-formed chain.
    pub fn next(&self, offset: u32) -> u32 {
        offset + self.size
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.allocated { "allocated" } else { "free" };
        write!(f, "Cell(size={}, {})", self.size, state)
    }
}

/// The page's backing storage: a fixed array of cells addressed by offset.
///
/// Owns one zero-initialised `Vec<u64>`. Header words are decoded on read
/// and encoded on write; payload words pass through as plain slices. The
/// array knows nothing about the cursor or sweep policy, only how to
/// carve and free blocks.
pub struct CellArray {
    words: Vec<u64>,
}

impl CellArray {
    /// Allocate a zeroed array of `cell_count` cells.
    pub fn new(cell_count: u32) -> Self {
        Self {
            words: vec![0; cell_count as usize],
        }
    }

    /// Number of cells in the array.
    pub fn cell_count(&self) -> u32 {
        self.words.len() as u32
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }

    /// Decode the header at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is outside the array.
    pub fn header(&self, offset: u32) -> Cell {
        Cell::from_word(self.words[offset as usize])
    }

    /// Encode `cell` into the header word at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is outside the array.
    pub fn set_header(&mut self, offset: u32, cell: Cell) {
        self.words[offset as usize] = cell.to_word();
    }

    /// Try to place an allocation of `cells_needed` cells in the block at
    /// `offset`.
    ///
    /// Fails with no side effect if the block is allocated or smaller than
    /// `cells_needed`. A larger block is split eagerly: the tail gets its
    /// own free header at `offset + cells_needed` and this block shrinks
    /// to exactly `cells_needed`; the tail stays unmerged with anything
    /// further along. On success the header is flagged allocated and the
    /// offset of the first payload cell is returned.
    pub fn try_allocate(&mut self, offset: u32, cells_needed: u32) -> Option<u32> {
        debug_assert!(cells_needed >= 1, "zero-cell allocation request");
        let cell = self.header(offset);
        if cell.allocated || cell.size < cells_needed {
            return None;
        }
        if cell.size > cells_needed {
            self.set_header(offset + cells_needed, Cell::free(cell.size - cells_needed));
        }
        self.set_header(
            offset,
            Cell {
                size: cells_needed,
                allocated: true,
            },
        );
        Some(offset + 1)
    }

    /// Clear the allocated flag of the block at `offset`.
    ///
    /// Always succeeds. Never merges with neighbors and never touches
    /// payload contents; coalescing waits for the next sweep.
    pub fn deallocate(&mut self, offset: u32) {
        let cell = self.header(offset);
        self.set_header(offset, Cell::free(cell.size));
    }

    /// Shared view of `len` payload cells starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the array.
    pub fn payload(&self, offset: u32, len: u32) -> &[u64] {
        let start = offset as usize;
        let end = start + len as usize;
        &self.words[start..end]
    }

    /// Mutable view of `len` payload cells starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the array.
    pub fn payload_mut(&mut self, offset: u32, len: u32) -> &mut [u64] {
        let start = offset as usize;
        let end = start + len as usize;
        &mut self.words[start..end]
    }
}
