//! The medium-object page: cursor allocation and sweep.
//!
//! A page services payload requests in the band between the small-page
//! and large-page size classes. It carves blocks out of its cell chain
//! with a next-fit cursor, defers all merging of free neighbors to
//! [`MediumPage::sweep`], and reports through sweep whether it still
//! holds live content so the pool can retire empty pages.

use log::{debug, info};

use scree_core::layout::MEDIUM_PAGE_CELL_COUNT;
use scree_core::{MarkBits, PayloadRef};

use crate::cell::{Cell, CellArray};

/// A fixed-capacity page carved into variable-length blocks.
///
/// The chain starting at `cells[1]` partitions the page exactly: each
/// block's header records its size, and the next header sits at
/// `offset + size`. `cells[0]` is a permanent size-0 sentinel that can
/// never satisfy a request and anchors the cursor when no block can.
pub struct MediumPage {
    /// Backing cell array; index 0 is the sentinel.
    cells: CellArray,
    /// Offset of the block the next allocation tries first.
    cur_block: u32,
}

impl MediumPage {
    /// Create a production-capacity page.
    ///
    /// `cells_needed` is the cell need of the allocation that triggered
    /// page creation, headers included.
    ///
    /// # Panics
    ///
    /// Panics if `cells_needed >= MEDIUM_PAGE_CELL_COUNT`; such a request
    /// belongs to a large page and would corrupt the layout here.
    pub fn create(cells_needed: u32) -> Self {
        Self::with_capacity(MEDIUM_PAGE_CELL_COUNT, cells_needed)
    }

    /// Create a page with an explicit capacity in cells.
    ///
    /// # Panics
    ///
    /// Panics if `cell_count < 2` (a page needs its sentinel plus one
    /// real cell) or if `cells_needed >= cell_count`.
    pub fn with_capacity(cell_count: u32, cells_needed: u32) -> Self {
        info!("MediumPage::create({cells_needed}): {cell_count} cells");
        assert!(
            cell_count >= 2,
            "page capacity {cell_count} leaves no room for a block"
        );
        assert!(
            cells_needed < cell_count,
            "cells_needed {cells_needed} is too large for a {cell_count}-cell page"
        );
        let mut cells = CellArray::new(cell_count);
        // Size 0, so the sentinel can never satisfy a real request.
        cells.set_header(0, Cell::free(0));
        cells.set_header(1, Cell::free(cell_count - 1));
        Self {
            cells,
            cur_block: 0,
        }
    }

    /// Release the page's backing memory.
    ///
    /// Dropping the page does the same; this spells the hand-back out at
    /// the call site. Caller contract: only once [`MediumPage::sweep`]
    /// has reported the page empty, or at shutdown with no outstanding
    /// payload references.
    pub fn destroy(self) {}

    /// Allocate a block with a payload of `block_size` cells.
    ///
    /// Tries the cursor block first, then repositions the cursor with one
    /// bounded scan and retries exactly once. Returns `None` when no
    /// single free block the search inspected was large enough; the pool
    /// responds by trying another page, never by retrying this one with
    /// the same request. A failed call leaves the chain untouched, though
    /// the cursor may still have moved to the largest free block seen.
    pub fn try_allocate(&mut self, block_size: u32) -> Option<PayloadRef> {
        debug!("MediumPage::try_allocate({block_size})");
        // One extra cell for the header; block sizes count payload only.
        let cells_needed = block_size.checked_add(1)?;
        if let Some(offset) = self.cells.try_allocate(self.cur_block, cells_needed) {
            return Some(PayloadRef::new(offset, block_size));
        }
        self.update_cur_block(cells_needed);
        let offset = self.cells.try_allocate(self.cur_block, cells_needed)?;
        Some(PayloadRef::new(offset, block_size))
    }

    /// Free the block owning `payload` without waiting for a sweep.
    ///
    /// Only clears the allocated flag; the block stays unmerged with free
    /// neighbors until the next sweep. `payload` must have come from this
    /// page's [`MediumPage::try_allocate`] and not been freed since.
    pub fn deallocate(&mut self, payload: PayloadRef) {
        debug!("MediumPage::deallocate({payload})");
        self.cells.deallocate(payload.offset() - 1);
    }

    /// Shared view of an allocated payload.
    ///
    /// # Panics
    ///
    /// Panics if `payload` does not lie within the page.
    pub fn payload(&self, payload: PayloadRef) -> &[u64] {
        self.cells.payload(payload.offset(), payload.len())
    }

    /// Mutable view of an allocated payload.
    ///
    /// # Panics
    ///
    /// Panics if `payload` does not lie within the page.
    pub fn payload_mut(&mut self, payload: PayloadRef) -> &mut [u64] {
        self.cells.payload_mut(payload.offset(), payload.len())
    }

    /// Reclaim dead blocks, then coalesce free runs and re-pick the cursor.
    ///
    /// Runs once per collection cycle, after marking, with exclusive
    /// access to the page. Pass 1 queries `marks` test-and-clear for each
    /// allocated block: marked blocks survive with their mark consumed,
    /// unmarked blocks are deallocated. Pass 2 absorbs every run of
    /// adjacent free blocks into its first block and parks the cursor on
    /// the largest free block (the sentinel if the page is fully
    /// allocated).
    ///
    /// Returns true if any block remained allocated; false signals the
    /// pool that the page is empty and can be destroyed.
    pub fn sweep(&mut self, marks: &mut dyn MarkBits) -> bool {
        debug!("MediumPage::sweep()");
        let end = self.cells.cell_count();
        let mut alive = false;
        let mut offset = 1;
        while offset != end {
            let cell = self.cells.header(offset);
            if cell.allocated {
                if marks.try_reset_mark(PayloadRef::new(offset + 1, cell.size - 1)) {
                    alive = true;
                } else {
                    self.cells.deallocate(offset);
                }
            }
            offset = cell.next(offset);
        }

        let mut max_offset = 0;
        let mut max_size = 0;
        let mut offset = 1;
        while offset != end {
            let mut cell = self.cells.header(offset);
            if !cell.allocated {
                loop {
                    let next = cell.next(offset);
                    if next == end {
                        break;
                    }
                    let follower = self.cells.header(next);
                    if follower.allocated {
                        break;
                    }
                    // The absorbed header becomes dead words inside this
                    // block; nothing ever reads it again.
                    cell.size += follower.size;
                }
                self.cells.set_header(offset, cell);
                if cell.size > max_size {
                    max_offset = offset;
                    max_size = cell.size;
                }
            }
            offset = cell.next(offset);
        }
        self.cur_block = max_offset;
        alive
    }

    /// Reposition the cursor for a request of `cells_needed` cells.
    ///
    /// Scans forward from the cursor to the page end, then wraps once
    /// from `cells[1]` up to the starting cursor, returning the moment a
    /// free block of sufficient size is seen. If nothing qualifies, the
    /// cursor lands on the largest free block seen across both passes
    /// (strictly-greater comparison, so the earliest maximum wins),
    /// possibly the sentinel.
    fn update_cur_block(&mut self, cells_needed: u32) {
        debug!("MediumPage::update_cur_block({cells_needed})");
        if self.cur_block == 0 {
            // The sentinel is only ever a starting point.
            self.cur_block = 1;
        }
        let end = self.cells.cell_count();
        let mut max_offset = 0;
        let mut max_size = 0;
        let mut offset = self.cur_block;
        while offset != end {
            let cell = self.cells.header(offset);
            if !cell.allocated && cell.size > max_size {
                max_offset = offset;
                max_size = cell.size;
                if cell.size >= cells_needed {
                    self.cur_block = max_offset;
                    return;
                }
            }
            offset = cell.next(offset);
        }
        debug!("MediumPage::update_cur_block: wrapping to page start");
        let mut offset = 1;
        while offset != self.cur_block {
            let cell = self.cells.header(offset);
            if !cell.allocated && cell.size > max_size {
                max_offset = offset;
                max_size = cell.size;
                if cell.size >= cells_needed {
                    self.cur_block = max_offset;
                    return;
                }
            }
            offset = cell.next(offset);
        }
        self.cur_block = max_offset;
    }

    /// Validate the chain and cursor. Diagnostics only, never on the
    /// allocation path.
    ///
    /// Checks that the cursor is inside the page and that walking from
    /// `cells[1]` yields strictly increasing offsets that land exactly on
    /// the page end. Returns false on the first violation instead of
    /// panicking, so tests can assert on it.
    pub fn check_invariants(&self) -> bool {
        if self.cur_block >= self.cells.cell_count() {
            return false;
        }
        let end = u64::from(self.cells.cell_count());
        let mut cur = 1u32;
        loop {
            // u64 arithmetic so corrupt sizes cannot wrap the comparison.
            let next = u64::from(cur) + u64::from(self.cells.header(cur).size);
            if next <= u64::from(cur) {
                return false;
            }
            if next > end {
                return false;
            }
            if next == end {
                return true;
            }
            cur = next as u32;
        }
    }

    /// Iterate `(offset, header)` over the real blocks of the chain.
    ///
    /// Starts at `cells[1]`; the sentinel is not yielded. Intended for
    /// well-formed chains: on a corrupted page the walk stops early at a
    /// zero-size header rather than looping.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            cells: &self.cells,
            offset: 1,
        }
    }

    /// Total capacity in cells, sentinel included.
    pub fn cell_count(&self) -> u32 {
        self.cells.cell_count()
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.cells.memory_bytes()
    }

    /// Offset of the block the next allocation will try first.
    ///
    /// 0 means the cursor is parked on the sentinel. Exposed for
    /// diagnostics and tests; allocation behavior is the contract,
    /// cursor position is not.
    pub fn cur_block(&self) -> u32 {
        self.cur_block
    }
}

/// Iterator over a page's block chain. See [`MediumPage::blocks`].
pub struct Blocks<'a> {
    cells: &'a CellArray,
    offset: u32,
}

impl Iterator for Blocks<'_> {
    type Item = (u32, Cell);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.cells.cell_count() {
            return None;
        }
        let cell = self.cells.header(self.offset);
        if cell.size == 0 {
            return None;
        }
        let item = (self.offset, cell);
        self.offset = cell.next(self.offset);
        Some(item)
    }
}
