//! Page geometry and size-class routing constants.
//!
//! All sizes are expressed in cells unless a name says bytes. One cell is
//! the uniform unit of the page: block headers occupy exactly one cell and
//! payload lengths are counted in cells.

/// Width of one cell in bytes. Header words and payload words share this
/// unit.
pub const CELL_BYTES: usize = 8;

/// Total byte size of a medium page's cell array.
pub const MEDIUM_PAGE_BYTES: usize = 256 * 1024;

/// Number of cells in a production medium page.
///
/// Cell 0 is the sentinel, so the largest block a page can ever hold is
/// `MEDIUM_PAGE_CELL_COUNT - 1` cells (header included).
pub const MEDIUM_PAGE_CELL_COUNT: u32 = (MEDIUM_PAGE_BYTES / CELL_BYTES) as u32;

/// Largest payload size (in cells) the pool routes to small pages.
/// Requests at or below this never reach a medium page.
pub const SMALL_PAGE_MAX_BLOCK_SIZE: u32 = 128;

/// Largest payload size (in cells) the pool routes to medium pages.
/// Requests above this get a dedicated large page.
pub const MEDIUM_PAGE_MAX_BLOCK_SIZE: u32 = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_count_matches_byte_size() {
        assert_eq!(
            MEDIUM_PAGE_CELL_COUNT as usize * CELL_BYTES,
            MEDIUM_PAGE_BYTES
        );
    }

    #[test]
    fn routing_band_is_ordered() {
        assert!(SMALL_PAGE_MAX_BLOCK_SIZE < MEDIUM_PAGE_MAX_BLOCK_SIZE);
        // The largest routed request must fit a page: payload + header.
        assert!(MEDIUM_PAGE_MAX_BLOCK_SIZE + 1 < MEDIUM_PAGE_CELL_COUNT);
    }
}
