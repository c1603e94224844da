//! Mutable, fixed-length slot containers.
//!
//! This module provides the container and its adaptors:
//!
//! - [`SlotContainer`]: fixed-length array of owned element handles
//! - [`SliceRange`] / [`StrideRange`]: normalized index ranges
//! - [`CompareOp`]: rich comparison operators
//! - [`Cursor`]: resumable, checkpointable iteration
//! - [`FieldAccessor`]: fixed-index get/set adaptor for attribute layers
//! - [`Reduction`] / [`CursorReduction`]: reconstruction descriptors
//! - [`SlotKind`] / [`SlotFactory`]: container variants and their allocators
//!
//! # Examples
//!
//! ## Slot storage
//!
//! ```rust
//! use slotted::slots::SlotContainer;
//!
//! let container: SlotContainer<i32> = [10, 20, 30].into_iter().collect();
//! container.set(1, 99).unwrap();
//! assert_eq!(container.get(1), Ok(99));
//!
//! // Handles share the same storage
//! let alias = container.clone();
//! alias.set(0, 11).unwrap();
//! assert_eq!(container.get(0), Ok(11));
//! ```
//!
//! ## Ranges
//!
//! ```rust
//! use slotted::slots::SlotContainer;
//!
//! let container: SlotContainer<i32> = [10, 99, 30].into_iter().collect();
//! let head = container.slice(0, 2).unwrap();
//! assert_eq!(head.to_vec().unwrap(), vec![10, 99]);
//!
//! let tail: SlotContainer<i32> = [40].into_iter().collect();
//! let joined = container.concat(&tail).unwrap();
//! assert_eq!(joined.to_vec().unwrap(), vec![10, 99, 30, 40]);
//!
//! container.slice_assign(0, 2, [1, 2]).unwrap();
//! assert_eq!(container.to_vec().unwrap(), vec![1, 2, 30]);
//! ```
//!
//! ## Comparison
//!
//! ```rust
//! use slotted::slots::{CompareOp, SlotContainer};
//!
//! let shorter: SlotContainer<i32> = [10, 99, 30].into_iter().collect();
//! let longer: SlotContainer<i32> = [10, 99, 30, 40].into_iter().collect();
//! assert_eq!(shorter.rich_compare(&longer, CompareOp::Less), Ok(Some(true)));
//! assert!(shorter < longer);
//! ```
//!
//! ## Cursors
//!
//! ```rust
//! use slotted::slots::SlotContainer;
//!
//! let container: SlotContainer<i32> = [1, 2].into_iter().collect();
//! let mut cursor = container.iter();
//! assert_eq!(cursor.next(), Some(1));
//! assert_eq!(cursor.next(), Some(2));
//! assert_eq!(cursor.next(), None);
//! assert_eq!(cursor.length_remaining(), 0);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer holding a container's storage.
///
/// Containers are single-mutator objects, so this is always `std::rc::Rc`.
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

/// Non-owning counterpart of [`ReferenceCounter`], used by the collector.
pub(crate) type WeakReference<T> = std::rc::Weak<T>;

mod accessor;
mod compare;
mod cursor;
mod kind;
mod range;
mod reduce;
mod storage;

pub use accessor::Accessed;
pub use accessor::FieldAccessor;
pub use compare::CompareOp;
pub use cursor::Cursor;
pub use cursor::Direction;
pub use kind::SlotFactory;
pub use kind::SlotKind;
pub use range::SliceRange;
pub use range::StrideRange;
pub use reduce::CursorReduction;
pub use reduce::Reduction;
pub use storage::SlotContainer;

pub(crate) use storage::SlotStorage;

// =============================================================================
// Tests
// =============================================================================
