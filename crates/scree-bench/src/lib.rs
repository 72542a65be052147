//! Benchmark profiles and utilities for the Scree page allocator.
//!
//! Provides page builders for the benchmark scenarios:
//!
//! - [`fragmented_page`]: alternating allocated/free blocks, the worst
//!   case for the cursor scan
//! - [`fill_page`]: seeded pseudo-random filling for churn scenarios

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scree_alloc::MediumPage;
use scree_core::PayloadRef;

/// Build a page of alternating allocated and free blocks.
///
/// Fills the page with `block_size` payloads, then frees every other
/// one without sweeping, so the free blocks stay split. Every free
/// block has payload capacity `block_size`, which makes any request
/// above that scan the whole chain and fail.
pub fn fragmented_page(capacity: u32, block_size: u32) -> MediumPage {
    let mut page = MediumPage::with_capacity(capacity, 0);
    let mut live = Vec::new();
    while let Some(p) = page.try_allocate(block_size) {
        live.push(p);
    }
    for p in live.iter().step_by(2) {
        page.deallocate(*p);
    }
    page
}

/// Allocate seeded pseudo-random sizes in `1..=max_block` until the
/// page refuses twice in a row. Returns the placed payloads.
pub fn fill_page(page: &mut MediumPage, seed: u64, max_block: u32) -> Vec<PayloadRef> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut live = Vec::new();
    let mut misses = 0;
    while misses < 2 {
        let size = 1 + rng.next_u32() % max_block;
        match page.try_allocate(size) {
            Some(p) => {
                misses = 0;
                live.push(p);
            }
            None => misses += 1,
        }
    }
    live
}
