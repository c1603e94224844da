//! Error types for slot containers.
//!
//! Every fallible container operation reports a [`SlotError`]. Errors are
//! synchronous and local: an operation that fails leaves the container
//! exactly as it was before the call.

use std::fmt;

/// Represents errors that can occur when working with slot containers.
///
/// # Examples
///
/// ```rust
/// use slotted::error::SlotError;
/// use slotted::slots::SlotContainer;
///
/// let container: SlotContainer<i32> = [10, 20, 30].into_iter().collect();
/// assert_eq!(
///     container.get(3),
///     Err(SlotError::Index { index: 3, length: 3 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// The requested size overflows address-space arithmetic or the
    /// allocator could not provide it.
    Allocation {
        /// Number of cells that was requested, saturated at `usize::MAX`.
        requested: usize,
    },
    /// An index fell outside `[0, length)` after negative-index normalization.
    Index {
        /// The index as given by the caller, before normalization.
        index: isize,
        /// Length of the container that was accessed.
        length: usize,
    },
    /// A ranged assignment supplied a different number of values than the
    /// target range holds. Containers never resize.
    LengthMismatch {
        /// Number of cells in the target range.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// The other operand is not a compatible container kind.
    TypeMismatch {
        /// Family the operation required.
        expected: &'static str,
        /// Kind that was supplied.
        found: &'static str,
    },
    /// The operation is not supported by fixed-shape containers.
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
    },
    /// A strided range was requested with a step of zero.
    ZeroStep,
    /// A cell was read before it was populated, or after the collector
    /// cleared the container.
    Vacant {
        /// Position of the vacant cell.
        index: usize,
    },
    /// A field accessor index could not be interpreted as a container index.
    InvalidIndex {
        /// Why the index was rejected.
        reason: &'static str,
    },
}

impl fmt::Display for SlotError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { requested } => {
                write!(formatter, "cannot allocate {requested} slots")
            }
            Self::Index { index, length } => {
                write!(
                    formatter,
                    "slot index {index} out of range for length {length}"
                )
            }
            Self::LengthMismatch { expected, actual } => write!(
                formatter,
                "attempt to assign sequence of size {actual} to slice of size {expected}"
            ),
            Self::TypeMismatch { expected, found } => write!(
                formatter,
                "expected a {expected} container (not \"{found}\")"
            ),
            Self::Unsupported { operation } => {
                write!(formatter, "{operation} is not supported by slot containers")
            }
            Self::ZeroStep => write!(formatter, "slice step cannot be zero"),
            Self::Vacant { index } => write!(formatter, "slot {index} is vacant"),
            Self::InvalidIndex { reason } => write!(formatter, "invalid slot index: {reason}"),
        }
    }
}

impl std::error::Error for SlotError {}
