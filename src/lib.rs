//! # slotted
//!
//! Fixed-length, mutable, reference-counted slot containers.
//!
//! ## Overview
//!
//! A [`SlotContainer`](slots::SlotContainer) behaves like a tuple whose cells
//! can be overwritten in place. It supports tuple-style slicing,
//! concatenation, repetition and lexicographic comparison, and it cooperates
//! with a cycle collector so that containers referencing each other can still
//! be reclaimed:
//!
//! - **Slot Storage**: a contiguous array of owned element handles, allocated
//!   once and never resized
//! - **Range & Comparison**: `slice`, `slice_assign`, `stride_assign`,
//!   `concat`, `repeat` and rich comparison
//! - **Cursors & Field Accessors**: resumable iteration with checkpointing, and
//!   a fixed-index get/set adaptor for attribute-binding layers
//! - **Cycle Collector**: [`Collector`](gc::Collector) finds groups of
//!   containers only reachable from each other and clears them
//!
//! ## Feature Flags
//!
//! - `derive`: `#[derive(Trace)]` for element types (enabled by default)
//! - `serde`: Serialize/Deserialize support
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use slotted::prelude::*;
//!
//! let record: SlotContainer<i32> = [10, 20, 30].into_iter().collect();
//! record.set(1, 99).unwrap();
//! assert_eq!(record.to_vec().unwrap(), vec![10, 99, 30]);
//!
//! let head = record.slice(0, 2).unwrap();
//! assert_eq!(head.to_vec().unwrap(), vec![10, 99]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use slotted::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::SlotError;
    pub use crate::gc::*;
    pub use crate::slots::*;
}

pub mod error;
pub mod gc;
pub mod slots;

/// Test utilities for enabling logging in tests.
#[cfg(test)]
pub(crate) mod test_utils {
    /// Initializes a tracing subscriber that writes through the test harness.
    ///
    /// Honors `RUST_LOG`, defaulting to `debug`. Safe to call from every test.
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
