//! Slot storage: the fixed-length array of owned element handles.
//!
//! This module provides [`SlotContainer`], the handle every other component
//! builds on.
//!
//! # Ownership
//!
//! Each cell exclusively owns one element handle `T`. Cloning a `T` is how a
//! new owning reference is taken; dropping a `T` releases it. The container
//! itself is reference-counted: cloning a [`SlotContainer`] takes a new
//! owning reference to the *same* storage.
//!
//! Cells are replaced by swapping the new handle in while the cell array is
//! mutably borrowed and releasing the outgoing handle only after the borrow
//! has ended. Drop code run by the release therefore never observes a
//! half-updated container.
//!
//! # Examples
//!
//! ```rust
//! use slotted::slots::SlotContainer;
//!
//! let container: SlotContainer<i32> = [10, 20, 30].into_iter().collect();
//! container.set(-1, 33).unwrap();
//!
//! assert_eq!(container.len(), 3);
//! assert_eq!(container.get(0), Ok(10));
//! assert_eq!(container.get(2), Ok(33));
//! assert!(container.get(3).is_err());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::iter::FromIterator;
use std::mem::size_of;

use super::{ReferenceCounter, SlotKind};
use crate::error::SlotError;

// =============================================================================
// Storage Definition
// =============================================================================

/// The shared allocation behind every [`SlotContainer`] handle.
pub(crate) struct SlotStorage<T> {
    /// Concrete variant of this container
    pub(crate) kind: SlotKind,
    /// Number of cells, fixed at construction
    pub(crate) length: usize,
    /// The cells; `None` only before population or after a collector clear
    pub(crate) cells: RefCell<Box<[Option<T>]>>,
}

/// Bytes charged to every container regardless of its length: the storage
/// header plus the two reference counts of the shared allocation.
const fn header_size<T>() -> usize {
    size_of::<SlotStorage<T>>() + 2 * size_of::<usize>()
}

/// Reserves an empty buffer able to hold `length` elements of type `U`.
///
/// The size is checked against `isize::MAX` (the largest allocation Rust
/// permits) before asking the allocator, so overflow and exhaustion both
/// surface as [`SlotError::Allocation`] instead of a panic.
pub(crate) fn allocate_cells<U>(length: usize) -> Result<Vec<U>, SlotError> {
    let element_size = size_of::<U>().max(1);
    let limit = (isize::MAX as usize - size_of::<SlotStorage<U>>()) / element_size;
    if length > limit {
        return Err(SlotError::Allocation { requested: length });
    }
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(length)
        .map_err(|_| SlotError::Allocation { requested: length })?;
    Ok(cells)
}

/// Normalizes a possibly negative index against `length`.
///
/// A negative index is offset by `length` once; the result must then fall in
/// `[0, length)`.
pub(crate) fn normalize_index(index: isize, length: usize) -> Result<usize, SlotError> {
    let signed_length = length as isize;
    let normalized = if index < 0 {
        index + signed_length
    } else {
        index
    };
    if normalized < 0 || normalized >= signed_length {
        return Err(SlotError::Index { index, length });
    }
    Ok(normalized as usize)
}

// =============================================================================
// SlotContainer Definition
// =============================================================================

/// A fixed-length, mutable, reference-counted tuple of owned element handles.
///
/// # Time Complexity
///
/// | Operation  | Complexity |
/// |------------|------------|
/// | `create`   | O(N)       |
/// | `get`      | O(1)       |
/// | `set`      | O(1)       |
/// | `len`      | O(1)       |
/// | `clear`    | O(N)       |
/// | `slice`    | O(K)       |
/// | `concat`   | O(N + M)   |
///
/// # Panics
///
/// Container methods borrow the cell array internally. Calling a mutating
/// method (`set`, `slice_assign`, `clear`, ...) on the same container from
/// inside a [`traverse`](Self::traverse) callback panics, the same way a
/// nested `RefCell` borrow does.
pub struct SlotContainer<T> {
    storage: ReferenceCounter<SlotStorage<T>>,
}

static_assertions::assert_eq_size!(SlotContainer<u64>, usize);
static_assertions::assert_not_impl_any!(SlotContainer<i32>: Send, Sync);

impl<T> SlotContainer<T> {
    /// Creates a `memoryslots` container of `length` vacant cells.
    ///
    /// Every cell must be populated with [`set`](Self::set) before the
    /// container is read; reading a vacant cell fails with
    /// [`SlotError::Vacant`].
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Allocation`] if `length` cells cannot be
    /// addressed or allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<String> = SlotContainer::create(2).unwrap();
    /// assert_eq!(container.len(), 2);
    /// assert!(!container.is_populated());
    ///
    /// container.set(0, "a".to_string()).unwrap();
    /// container.set(1, "b".to_string()).unwrap();
    /// assert!(container.is_populated());
    /// ```
    pub fn create(length: usize) -> Result<Self, SlotError> {
        Self::create_with_kind(SlotKind::default(), length)
    }

    /// Creates a container of the given kind with `length` vacant cells.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Allocation`] if `length` cells cannot be
    /// addressed or allocated.
    pub fn create_with_kind(kind: SlotKind, length: usize) -> Result<Self, SlotError> {
        let mut cells = allocate_cells::<Option<T>>(length)?;
        cells.resize_with(length, || None);
        tracing::trace!(kind = kind.name(), length, "allocated slot container");
        Ok(Self::from_cells(kind, cells))
    }

    /// Builds a container that takes ownership of `elements` in order.
    #[must_use]
    pub fn from_vec_with_kind(kind: SlotKind, elements: Vec<T>) -> Self {
        Self::from_cells(kind, elements.into_iter().map(Some).collect())
    }

    fn from_cells(kind: SlotKind, cells: Vec<Option<T>>) -> Self {
        Self {
            storage: ReferenceCounter::new(SlotStorage {
                kind,
                length: cells.len(),
                cells: RefCell::new(cells.into_boxed_slice()),
            }),
        }
    }

    /// Builds a container from a fallible sequence.
    ///
    /// The input is fully materialized first; the first error it yields is
    /// returned unchanged and no container is created.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `elements`, or
    /// [`SlotError::Allocation`] (converted into `E`) if the materialized
    /// length cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::error::SlotError;
    /// use slotted::slots::SlotContainer;
    ///
    /// let parsed: Result<SlotContainer<i32>, SlotError> =
    ///     SlotContainer::try_from_iter([Ok(1), Ok(2)]);
    /// assert_eq!(parsed.unwrap().len(), 2);
    ///
    /// let failed: Result<SlotContainer<i32>, SlotError> =
    ///     SlotContainer::try_from_iter([Ok(1), Err(SlotError::ZeroStep)]);
    /// assert_eq!(failed.err(), Some(SlotError::ZeroStep));
    /// ```
    pub fn try_from_iter<I, E>(elements: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
        E: From<SlotError>,
    {
        let realized = elements.into_iter().collect::<Result<Vec<T>, E>>()?;
        let mut cells = allocate_cells::<Option<T>>(realized.len())?;
        cells.extend(realized.into_iter().map(Some));
        Ok(Self::from_cells(SlotKind::default(), cells))
    }

    /// Returns the number of cells.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.length
    }

    /// Returns `true` if the container has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.length == 0
    }

    /// Returns the concrete variant of this container.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SlotKind {
        self.storage.kind
    }

    /// Returns `true` if both handles refer to the same container.
    #[inline]
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.storage, &other.storage)
    }

    /// Returns `true` if every cell holds an element.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.storage.cells.borrow().iter().all(Option::is_some)
    }

    /// Replaces the element at `index`, releasing the previous one.
    ///
    /// Negative indices count from the end. The new element is stored before
    /// the old one is released.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Index`] if `index` is out of range; the container
    /// is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = [10, 20, 30].into_iter().collect();
    /// container.set(1, 99).unwrap();
    /// assert_eq!(container.to_vec().unwrap(), vec![10, 99, 30]);
    /// ```
    pub fn set(&self, index: isize, value: T) -> Result<(), SlotError> {
        let position = normalize_index(index, self.len())?;
        let previous = self.storage.cells.borrow_mut()[position].replace(value);
        drop(previous);
        Ok(())
    }

    /// Releases every element and leaves every cell vacant.
    ///
    /// The collector uses this to break reference cycles. The container stays
    /// allocated, but subsequent reads fail with [`SlotError::Vacant`] until
    /// cells are populated again.
    pub fn clear(&self) {
        let released: Vec<T> = self
            .storage
            .cells
            .borrow_mut()
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        drop(released);
    }

    /// Visits every live element in order.
    ///
    /// Vacant cells are skipped.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        for element in self.storage.cells.borrow().iter().flatten() {
            visit(element);
        }
    }

    /// Returns the estimated memory footprint in bytes: a fixed header plus
    /// one handle-sized cell per element.
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let small: SlotContainer<u64> = (0..2).collect();
    /// let large: SlotContainer<u64> = (0..10).collect();
    /// assert_eq!(
    ///     large.size_estimate() - small.size_estimate(),
    ///     8 * std::mem::size_of::<Option<u64>>()
    /// );
    /// ```
    #[must_use]
    pub fn size_estimate(&self) -> usize {
        header_size::<T>() + self.len() * size_of::<Option<T>>()
    }

    /// Runs `f` with shared access to the raw cells.
    pub(crate) fn with_cells<R>(&self, f: impl FnOnce(&[Option<T>]) -> R) -> R {
        f(&self.storage.cells.borrow())
    }

    /// Swaps `values` into the cells at `positions`, then releases the
    /// previous occupants after the borrow has ended.
    ///
    /// Callers validate `positions` and the value count beforehand.
    pub(crate) fn replace_cells<I, V>(&self, positions: I, values: V)
    where
        I: IntoIterator<Item = usize>,
        V: IntoIterator<Item = T>,
    {
        let released: Vec<Option<T>> = {
            let mut cells = self.storage.cells.borrow_mut();
            positions
                .into_iter()
                .zip(values)
                .map(|(position, value)| cells[position].replace(value))
                .collect()
        };
        drop(released);
    }

    pub(crate) const fn storage(&self) -> &ReferenceCounter<SlotStorage<T>> {
        &self.storage
    }
}

impl<T: Clone> SlotContainer<T> {
    /// Returns a new owning reference to the element at `index`.
    ///
    /// Negative indices count from the end.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Index`] if `index` is out of range, or
    /// [`SlotError::Vacant`] if the cell holds no element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(container.get(0), Ok(1));
    /// assert_eq!(container.get(-1), Ok(3));
    /// assert!(container.get(-4).is_err());
    /// ```
    pub fn get(&self, index: isize) -> Result<T, SlotError> {
        let position = normalize_index(index, self.len())?;
        self.get_at(position)
    }

    /// Reads an already normalized position.
    pub(crate) fn get_at(&self, position: usize) -> Result<T, SlotError> {
        self.storage.cells.borrow()[position]
            .clone()
            .ok_or(SlotError::Vacant { index: position })
    }

    /// Returns a plain ordered snapshot of the elements.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Vacant`] if any cell is vacant.
    pub fn to_vec(&self) -> Result<Vec<T>, SlotError> {
        self.with_cells(|cells| collect_range(cells, 0..cells.len()))
    }
}

/// Clones the elements of `cells[range]`, failing on the first vacant cell.
pub(crate) fn collect_range<T: Clone>(
    cells: &[Option<T>],
    range: std::ops::Range<usize>,
) -> Result<Vec<T>, SlotError> {
    let mut elements = allocate_cells::<T>(range.len())?;
    for position in range {
        let element = cells[position]
            .as_ref()
            .ok_or(SlotError::Vacant { index: position })?;
        elements.push(element.clone());
    }
    Ok(elements)
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for SlotContainer<T> {
    /// Takes a new owning reference to the same container.
    #[inline]
    fn clone(&self) -> Self {
        Self {
            storage: ReferenceCounter::clone(&self.storage),
        }
    }
}

impl<T> Default for SlotContainer<T> {
    #[inline]
    fn default() -> Self {
        Self::from_cells(SlotKind::default(), Vec::new())
    }
}

impl<T> FromIterator<T> for SlotContainer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<T> = iter.into_iter().collect();
        Self::from_vec_with_kind(SlotKind::default(), elements)
    }
}

impl<T> From<Vec<T>> for SlotContainer<T> {
    #[inline]
    fn from(elements: Vec<T>) -> Self {
        Self::from_vec_with_kind(SlotKind::default(), elements)
    }
}

/// Renders a cell for `Debug`, marking vacant cells.
struct DebugCell<'a, T>(&'a Option<T>);

impl<T: fmt::Debug> fmt::Debug for DebugCell<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(element) => fmt::Debug::fmt(element, formatter),
            None => formatter.write_str("<vacant>"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SlotContainer<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_cells(|cells| {
            formatter
                .debug_list()
                .entries(cells.iter().map(DebugCell))
                .finish()
        })
    }
}

/// Formats as `kind(e0, e1, ...)`.
///
/// ```rust
/// use slotted::slots::SlotContainer;
///
/// let container: SlotContainer<i32> = (0..3).collect();
/// assert_eq!(format!("{container}"), "memoryslots(0, 1, 2)");
/// ```
impl<T: fmt::Display> fmt::Display for SlotContainer<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}(", self.kind())?;
        self.with_cells(|cells| {
            let mut first = true;
            for cell in cells {
                if first {
                    first = false;
                } else {
                    write!(formatter, ", ")?;
                }
                match cell {
                    Some(element) => write!(formatter, "{element}")?,
                    None => write!(formatter, "<vacant>")?,
                }
            }
            Ok(())
        })?;
        write!(formatter, ")")
    }
}

// =============================================================================
// Tests
// =============================================================================
