//! Test utilities and mock types for Scree development.
//!
//! Provides [`MockMarkBits`], an in-memory stand-in for the collector's
//! mark subsystem, so page sweep behavior can be exercised without a
//! tracing phase.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use indexmap::IndexSet;

use scree_core::{MarkBits, PayloadRef};

/// Mock implementation of [`MarkBits`].
///
/// Backed by an `IndexSet<PayloadRef>` so iteration order is insertion
/// order and test output stays deterministic. Mark the payloads a test
/// considers reachable with [`mark`](MockMarkBits::mark) before handing
/// the mock to `sweep`; the test-and-clear query removes each queried
/// entry, so marks must be re-established before every sweep, exactly as
/// a collector's mark phase would.
#[derive(Debug, Default)]
pub struct MockMarkBits {
    marked: IndexSet<PayloadRef>,
}

impl MockMarkBits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mark for `payload`. Marking twice is a no-op.
    pub fn mark(&mut self, payload: PayloadRef) {
        self.marked.insert(payload);
    }

    /// Clear the mark for `payload` without reporting it.
    pub fn unmark(&mut self, payload: PayloadRef) {
        self.marked.shift_remove(&payload);
    }

    /// Whether `payload` is currently marked.
    pub fn is_marked(&self, payload: PayloadRef) -> bool {
        self.marked.contains(&payload)
    }

    /// Number of currently marked payloads.
    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }
}

impl MarkBits for MockMarkBits {
    fn try_reset_mark(&mut self, payload: PayloadRef) -> bool {
        self.marked.shift_remove(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_then_reset_reports_prior_state_once() {
        let mut marks = MockMarkBits::new();
        let p = PayloadRef::new(2, 5);
        marks.mark(p);
        assert!(marks.is_marked(p));
        assert!(marks.try_reset_mark(p));
        // The first query consumed the mark.
        assert!(!marks.try_reset_mark(p));
        assert!(!marks.is_marked(p));
    }

    #[test]
    fn unmarked_payload_resets_to_false() {
        let mut marks = MockMarkBits::new();
        assert!(!marks.try_reset_mark(PayloadRef::new(1, 1)));
    }

    #[test]
    fn marking_twice_is_one_entry() {
        let mut marks = MockMarkBits::new();
        let p = PayloadRef::new(4, 3);
        marks.mark(p);
        marks.mark(p);
        assert_eq!(marks.marked_count(), 1);
    }

    #[test]
    fn unmark_clears_without_reporting() {
        let mut marks = MockMarkBits::new();
        let p = PayloadRef::new(9, 2);
        marks.mark(p);
        marks.unmark(p);
        assert!(!marks.try_reset_mark(p));
    }
}
