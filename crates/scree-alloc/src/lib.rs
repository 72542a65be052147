//! Fixed-capacity cell-chain pages for medium object allocation.
//!
//! A [`MediumPage`] is one contiguous region carved into variable-length
//! blocks. Each block starts with a one-cell header (size in cells plus an
//! allocated flag); the next header sits at `offset + size`, so the chain
//! is implied by the layout rather than stored as links.
//!
//! # Architecture
//!
//! ```text
//! MediumPage
//! ├── CellArray (one zeroed Vec<u64>: header words + payload words)
//! │     cells[0] sentinel ─ cells[1] first real block ─ … ─ page end
//! └── cur_block (next-fit cursor: offset of the block tried first)
//! ```
//!
//! # Allocation policy
//!
//! - Next-fit: try the cursor block, reposition with one bounded scan
//!   (forward, then wrap once), retry exactly once.
//! - Eager splitting: an oversized free block is carved, leaving the
//!   remainder behind its own free header.
//! - Deferred coalescing: deallocation only clears the allocated flag;
//!   adjacent free blocks merge during [`MediumPage::sweep`], which also
//!   parks the cursor on the largest free block for the next cycle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod medium;

pub use cell::{Cell, CellArray};
pub use medium::MediumPage;
