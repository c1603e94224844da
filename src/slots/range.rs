//! Range operations: slicing, ranged assignment, concatenation and repetition.
//!
//! Ranges are never stored; they are normalized against the container length
//! on every call.
//!
//! - [`SliceRange`]: contiguous `[start, stop)` clamped into the container
//! - [`StrideRange`]: `(start, stop, step)` with standard strided semantics
//!
//! Ranged assignment never resizes a container. The replacement values are
//! realized in full and counted before the first cell is touched, so a
//! count mismatch leaves the container unchanged.

use smallvec::SmallVec;

use super::storage::collect_range;
use super::{SlotContainer, SlotFactory};
use crate::error::SlotError;

/// Replacement values that stay inline while a ranged assignment is applied.
const INLINE_REPLACEMENTS: usize = 8;

type Replacements<T> = SmallVec<[T; INLINE_REPLACEMENTS]>;

// =============================================================================
// SliceRange
// =============================================================================

/// A contiguous `[start, stop)` range clamped into a container.
///
/// # Examples
///
/// ```rust
/// use slotted::slots::SliceRange;
///
/// let range = SliceRange::clamp(-5, 10, 4);
/// assert_eq!((range.start(), range.stop()), (0, 4));
///
/// // stop below start collapses to an empty range at start
/// let empty = SliceRange::clamp(3, 1, 4);
/// assert_eq!((empty.start(), empty.stop()), (3, 3));
/// assert!(empty.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceRange {
    start: usize,
    stop: usize,
}

impl SliceRange {
    /// Clamps `low` into `[0, length]` and `high` into `[low, length]`.
    ///
    /// Negative bounds are *not* offset by `length`; they clamp to zero.
    #[must_use]
    pub fn clamp(low: isize, high: isize, length: usize) -> Self {
        let signed_length = length as isize;
        let start = low.clamp(0, signed_length);
        let stop = high.clamp(start, signed_length);
        Self {
            start: start as usize,
            stop: stop as usize,
        }
    }

    /// Returns the first position in the range.
    #[inline]
    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    /// Returns the position one past the end of the range.
    #[inline]
    #[must_use]
    pub const fn stop(self) -> usize {
        self.stop
    }

    /// Returns the number of positions in the range.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.stop - self.start
    }

    /// Returns `true` if the range holds no positions.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.stop
    }

    const fn covers(self, length: usize) -> bool {
        self.start == 0 && self.stop == length
    }
}

// =============================================================================
// StrideRange
// =============================================================================

/// A strided range `(start, stop, step)` normalized against a length.
///
/// Missing bounds default according to the direction of `step`. A negative
/// bound is offset by the length once and then clamped. A step that points
/// away from `stop` yields an empty range rather than an error.
///
/// # Examples
///
/// ```rust
/// use slotted::slots::StrideRange;
///
/// // every other element of a length-5 container
/// let range = StrideRange::new(None, None, Some(2), 5).unwrap();
/// assert_eq!(range.indices().collect::<Vec<_>>(), vec![0, 2, 4]);
///
/// // reversed
/// let reversed = StrideRange::new(None, None, Some(-1), 3).unwrap();
/// assert_eq!(reversed.indices().collect::<Vec<_>>(), vec![2, 1, 0]);
///
/// // step pointing away from stop
/// let empty = StrideRange::new(Some(1), Some(4), Some(-1), 5).unwrap();
/// assert!(empty.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrideRange {
    start: isize,
    stop: isize,
    step: isize,
    slice_length: usize,
}

impl StrideRange {
    /// Normalizes `(start, stop, step)` against `length`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::ZeroStep`] if `step` is zero.
    pub fn new(
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
        length: usize,
    ) -> Result<Self, SlotError> {
        let step = step.unwrap_or(1);
        if step == 0 {
            return Err(SlotError::ZeroStep);
        }
        // keeps `-step` representable
        let step = step.max(-isize::MAX);

        let signed_length = length as isize;
        let (lower, upper) = if step < 0 {
            (-1, signed_length - 1)
        } else {
            (0, signed_length)
        };
        let adjust = |bound: isize| {
            if bound < 0 {
                (bound + signed_length).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let (default_start, default_stop) = if step < 0 {
            (upper, lower)
        } else {
            (lower, upper)
        };
        let start = start.map_or(default_start, adjust);
        let stop = stop.map_or(default_stop, adjust);

        let slice_length = if step < 0 {
            if stop < start {
                ((start - stop - 1) / -step + 1) as usize
            } else {
                0
            }
        } else if start < stop {
            ((stop - start - 1) / step + 1) as usize
        } else {
            0
        };

        Ok(Self {
            start,
            stop,
            step,
            slice_length,
        })
    }

    /// Returns the normalized start bound.
    #[inline]
    #[must_use]
    pub const fn start(self) -> isize {
        self.start
    }

    /// Returns the normalized stop bound (`-1` means "before the first cell").
    #[inline]
    #[must_use]
    pub const fn stop(self) -> isize {
        self.stop
    }

    /// Returns the step.
    #[inline]
    #[must_use]
    pub const fn step(self) -> isize {
        self.step
    }

    /// Returns the number of positions the range visits.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.slice_length
    }

    /// Returns `true` if the range visits no positions.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.slice_length == 0
    }

    /// Returns the visited positions in order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..self.slice_length).map(move |offset| (self.start + offset as isize * self.step) as usize)
    }
}

// =============================================================================
// Range Operations
// =============================================================================

impl<T: Clone> SlotContainer<T> {
    /// Returns the elements in `[low, high)` as a new container.
    ///
    /// Bounds are clamped with [`SliceRange::clamp`]. When the clamped range
    /// covers the whole container and the container is of an exact kind, the
    /// same container may be returned instead of a copy; callers must not
    /// rely on a distinct object in that case.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Allocation`] if the result cannot be allocated, or
    /// [`SlotError::Vacant`] if the range includes a vacant cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = (0..5).collect();
    /// assert_eq!(container.slice(1, 3).unwrap().to_vec().unwrap(), vec![1, 2]);
    /// assert_eq!(container.slice(-10, 10).unwrap().len(), 5);
    /// assert!(container.slice(4, 2).unwrap().is_empty());
    /// ```
    pub fn slice(&self, low: isize, high: isize) -> Result<Self, SlotError> {
        let range = SliceRange::clamp(low, high, self.len());
        if range.covers(self.len()) && self.kind().is_exact() {
            return Ok(self.clone());
        }
        let elements = self.with_cells(|cells| collect_range(cells, range.start..range.stop))?;
        Ok(self.kind().assemble(elements))
    }

    /// Returns a shallow copy; equivalent to `slice(0, len)`.
    ///
    /// # Errors
    ///
    /// Same as [`slice`](Self::slice).
    pub fn copy(&self) -> Result<Self, SlotError> {
        self.slice(0, self.len() as isize)
    }

    /// Returns a shallow copy that is always a distinct container.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Vacant`] if any cell is vacant.
    pub fn snapshot(&self) -> Result<Self, SlotError> {
        let elements = self.to_vec()?;
        Ok(self.kind().assemble(elements))
    }

    /// Returns the elements visited by a strided range as a new container.
    ///
    /// A step-1 range covering an exact-kind container may return the same
    /// container, as with [`slice`](Self::slice).
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::ZeroStep`] for a zero step, and the errors of
    /// [`slice`](Self::slice) otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = (0..6).collect();
    /// let odd = container.get_strided(Some(1), None, Some(2)).unwrap();
    /// assert_eq!(odd.to_vec().unwrap(), vec![1, 3, 5]);
    ///
    /// let reversed = container.get_strided(None, None, Some(-1)).unwrap();
    /// assert_eq!(reversed.to_vec().unwrap(), vec![5, 4, 3, 2, 1, 0]);
    /// ```
    pub fn get_strided(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Result<Self, SlotError> {
        let range = StrideRange::new(start, stop, step, self.len())?;
        if range.is_empty() {
            return self.kind().allocate(0);
        }
        if range.start == 0
            && range.step == 1
            && range.len() == self.len()
            && self.kind().is_exact()
        {
            return Ok(self.clone());
        }
        let elements = self.with_cells(|cells| {
            let mut elements = self.kind().reserve::<T>(range.len())?;
            for position in range.indices() {
                let element = cells[position]
                    .as_ref()
                    .ok_or(SlotError::Vacant { index: position })?;
                elements.push(element.clone());
            }
            Ok::<_, SlotError>(elements)
        })?;
        Ok(self.kind().assemble(elements))
    }

    /// Replaces the cells in `[low, high)` with `values`.
    ///
    /// `values` is realized in full first. Bounds are clamped with
    /// [`SliceRange::clamp`]. The number of values must equal the size of the
    /// clamped range; containers never grow or shrink.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::LengthMismatch`] if the counts differ. The
    /// container is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::error::SlotError;
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = (0..4).collect();
    /// container.slice_assign(1, 3, [10, 20]).unwrap();
    /// assert_eq!(container.to_vec().unwrap(), vec![0, 10, 20, 3]);
    ///
    /// assert_eq!(
    ///     container.slice_assign(0, 2, [1]),
    ///     Err(SlotError::LengthMismatch { expected: 2, actual: 1 })
    /// );
    /// assert_eq!(container.to_vec().unwrap(), vec![0, 10, 20, 3]);
    /// ```
    pub fn slice_assign<I>(&self, low: isize, high: isize, values: I) -> Result<(), SlotError>
    where
        I: IntoIterator<Item = T>,
    {
        let replacements: Replacements<T> = values.into_iter().collect();
        let range = SliceRange::clamp(low, high, self.len());
        self.assign_range(range, replacements)
    }

    /// Replaces the cells in `[low, high)` with the elements of `source`.
    ///
    /// When `source` is this very container, an independent snapshot is
    /// taken first so that no cell is read after it has been overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Vacant`] if `source` has a vacant cell, and the
    /// errors of [`slice_assign`](Self::slice_assign) otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = (0..3).collect();
    /// container.slice_assign_from(0, 3, &container).unwrap();
    /// assert_eq!(container.to_vec().unwrap(), vec![0, 1, 2]);
    /// ```
    pub fn slice_assign_from(&self, low: isize, high: isize, source: &Self) -> Result<(), SlotError> {
        if self.is_same(source) {
            let snapshot = source.snapshot()?;
            return self.slice_assign_from(low, high, &snapshot);
        }
        let replacements = source.to_vec()?;
        self.slice_assign(low, high, replacements)
    }

    /// Replaces the cells visited by a strided range with `values`.
    ///
    /// A step of one delegates to the contiguous assignment.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::ZeroStep`] for a zero step and
    /// [`SlotError::LengthMismatch`] if the number of values differs from the
    /// number of visited cells. The container is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = (0..5).collect();
    /// container.stride_assign(None, None, Some(2), [10, 20, 30]).unwrap();
    /// assert_eq!(container.to_vec().unwrap(), vec![10, 1, 20, 3, 30]);
    /// ```
    pub fn stride_assign<I>(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
        values: I,
    ) -> Result<(), SlotError>
    where
        I: IntoIterator<Item = T>,
    {
        let range = StrideRange::new(start, stop, step, self.len())?;
        let replacements: Replacements<T> = values.into_iter().collect();
        if range.step == 1 {
            let contiguous = SliceRange::clamp(range.start, range.stop, self.len());
            return self.assign_range(contiguous, replacements);
        }
        if replacements.len() != range.len() {
            return Err(SlotError::LengthMismatch {
                expected: range.len(),
                actual: replacements.len(),
            });
        }
        self.replace_cells(range.indices(), replacements);
        Ok(())
    }

    /// Strided counterpart of [`slice_assign_from`](Self::slice_assign_from).
    ///
    /// Assigning a container to a strided view of itself (for example
    /// reversing it in place) goes through a snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`stride_assign`](Self::stride_assign), plus
    /// [`SlotError::Vacant`] for a vacant source cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = (0..4).collect();
    /// container.stride_assign_from(None, None, Some(-1), &container).unwrap();
    /// assert_eq!(container.to_vec().unwrap(), vec![3, 2, 1, 0]);
    /// ```
    pub fn stride_assign_from(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
        source: &Self,
    ) -> Result<(), SlotError> {
        if self.is_same(source) {
            let snapshot = source.snapshot()?;
            return self.stride_assign_from(start, stop, step, &snapshot);
        }
        let replacements = source.to_vec()?;
        self.stride_assign(start, stop, step, replacements)
    }

    fn assign_range(&self, range: SliceRange, replacements: Replacements<T>) -> Result<(), SlotError> {
        if replacements.len() != range.len() {
            return Err(SlotError::LengthMismatch {
                expected: range.len(),
                actual: replacements.len(),
            });
        }
        self.replace_cells(range.start..range.stop, replacements);
        Ok(())
    }

    /// Returns a new container holding this container's elements followed by
    /// `other`'s.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::TypeMismatch`] if `other` belongs to a different
    /// family, [`SlotError::Allocation`] if the combined length overflows, or
    /// [`SlotError::Vacant`] if either operand has a vacant cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let left: SlotContainer<i32> = [1, 2].into_iter().collect();
    /// let right: SlotContainer<i32> = [3].into_iter().collect();
    /// assert_eq!(left.concat(&right).unwrap().to_vec().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn concat(&self, other: &Self) -> Result<Self, SlotError> {
        if !self.kind().is_compatible_with(other.kind()) {
            return Err(SlotError::TypeMismatch {
                expected: self.kind().family(),
                found: other.kind().name(),
            });
        }
        let size = self
            .len()
            .checked_add(other.len())
            .ok_or(SlotError::Allocation {
                requested: usize::MAX,
            })?;
        let mut elements = self.kind().reserve::<T>(size)?;
        elements.extend(self.with_cells(|cells| collect_range(cells, 0..cells.len()))?);
        elements.extend(other.with_cells(|cells| collect_range(cells, 0..cells.len()))?);
        Ok(self.kind().assemble(elements))
    }

    /// Returns a new container holding `count` back-to-back copies of this
    /// container's elements.
    ///
    /// A negative `count` is treated as zero.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Allocation`] if the total length overflows, or
    /// [`SlotError::Vacant`] if a cell is vacant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = [1, 2].into_iter().collect();
    /// assert_eq!(container.repeat(3).unwrap().to_vec().unwrap(), vec![1, 2, 1, 2, 1, 2]);
    /// assert!(container.repeat(-1).unwrap().is_empty());
    /// ```
    pub fn repeat(&self, count: isize) -> Result<Self, SlotError> {
        let count = count.max(0) as usize;
        if self.is_empty() {
            return self.kind().allocate(0);
        }
        let size = self
            .len()
            .checked_mul(count)
            .ok_or(SlotError::Allocation {
                requested: usize::MAX,
            })?;
        let tile = self.to_vec()?;
        let mut elements = self.kind().reserve::<T>(size)?;
        for _ in 0..count {
            elements.extend(tile.iter().cloned());
        }
        Ok(self.kind().assemble(elements))
    }
}
