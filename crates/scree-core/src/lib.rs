//! Core types and traits for the Scree page allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared between the page allocator and the collector driving
//! it: page geometry constants, the [`PayloadRef`] handle that stands in
//! for a raw payload pointer, and the [`MarkBits`] boundary to the mark
//! subsystem.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod layout;
pub mod payload;
pub mod traits;

pub use payload::PayloadRef;
pub use traits::MarkBits;
