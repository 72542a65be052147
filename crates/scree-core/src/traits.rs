//! The mark-subsystem boundary trait.

use crate::payload::PayloadRef;

/// Test-and-clear access to the collector's per-payload mark state.
///
/// The tracing phase sets marks on reachable payloads; the page consumes
/// them during sweep. A set mark means the block survives the cycle, and
/// the query clears it so the next cycle starts unmarked. Atomicity with
/// respect to concurrent tracing is the implementor's concern, not the
/// page's.
pub trait MarkBits {
    /// Clear the mark for `payload` and return whether it was set.
    fn try_reset_mark(&mut self, payload: PayloadRef) -> bool;
}
