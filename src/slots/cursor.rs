//! Resumable cursors over slot containers.
//!
//! A [`Cursor`] holds one owning reference to its container while it is
//! active. Once it runs off the end it releases that reference and stays
//! exhausted for good; restoring a position afterwards has no effect.
//!
//! # Checkpointing
//!
//! [`Cursor::position`] exposes the resume point and
//! [`Cursor::restore_position`] moves the cursor back to one, clamped into
//! `[0, length]`. For a forward cursor the position is the index of the next
//! element; for a reversed cursor it is the number of elements not yet read.
//!
//! # Examples
//!
//! ```rust
//! use slotted::slots::SlotContainer;
//!
//! let container: SlotContainer<i32> = [1, 2, 3].into_iter().collect();
//! let mut cursor = container.iter();
//! assert_eq!(cursor.next(), Some(1));
//!
//! let checkpoint = cursor.position().unwrap();
//! assert_eq!(cursor.next(), Some(2));
//!
//! cursor.restore_position(checkpoint as isize);
//! assert_eq!(cursor.collect::<Vec<_>>(), vec![2, 3]);
//! ```

use std::iter::FusedIterator;

use super::SlotContainer;

/// The order in which a cursor walks its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// From the first element to the last.
    #[default]
    Forward,
    /// From the last element to the first.
    Backward,
}

enum CursorState<T> {
    Active {
        position: usize,
        target: SlotContainer<T>,
    },
    Exhausted,
}

/// A resumable, checkpointable cursor over a [`SlotContainer`].
///
/// Each yielded element is a new owning reference taken with `Clone`.
pub struct Cursor<T> {
    state: CursorState<T>,
    direction: Direction,
}

impl<T> Cursor<T> {
    /// Creates a forward cursor positioned at the first element.
    #[must_use]
    pub const fn new(target: SlotContainer<T>) -> Self {
        Self {
            state: CursorState::Active {
                position: 0,
                target,
            },
            direction: Direction::Forward,
        }
    }

    /// Creates a cursor walking from the last element to the first.
    #[must_use]
    pub fn new_reversed(target: SlotContainer<T>) -> Self {
        Self {
            state: CursorState::Active {
                position: target.len(),
                target,
            },
            direction: Direction::Backward,
        }
    }

    /// Creates a cursor in `direction` over `target`.
    #[must_use]
    pub fn with_direction(target: SlotContainer<T>, direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self::new(target),
            Direction::Backward => Self::new_reversed(target),
        }
    }

    /// Returns the direction this cursor walks in.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the number of elements left to read; `0` once exhausted.
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = [1, 2].into_iter().collect();
    /// let mut cursor = container.iter_rev();
    /// assert_eq!(cursor.length_remaining(), 2);
    /// assert_eq!(cursor.next(), Some(2));
    /// assert_eq!(cursor.length_remaining(), 1);
    /// ```
    #[must_use]
    pub fn length_remaining(&self) -> usize {
        match (&self.state, self.direction) {
            (CursorState::Active { position, target }, Direction::Forward) => {
                target.len() - position
            }
            (CursorState::Active { position, .. }, Direction::Backward) => *position,
            (CursorState::Exhausted, _) => 0,
        }
    }

    /// Returns the resume point, or `None` once the cursor is exhausted.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match &self.state {
            CursorState::Active { position, .. } => Some(*position),
            CursorState::Exhausted => None,
        }
    }

    /// Returns the container being walked, or `None` once exhausted.
    #[must_use]
    pub const fn target(&self) -> Option<&SlotContainer<T>> {
        match &self.state {
            CursorState::Active { target, .. } => Some(target),
            CursorState::Exhausted => None,
        }
    }

    /// Returns `true` once the cursor has released its container.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.state, CursorState::Exhausted)
    }

    /// Moves the cursor to `position`, clamped into `[0, length]`.
    ///
    /// Restoring a forward cursor to `length`, or a reversed cursor to `0`,
    /// leaves nothing to read. An exhausted cursor ignores the call.
    ///
    /// ```rust
    /// use slotted::slots::SlotContainer;
    ///
    /// let container: SlotContainer<i32> = [1, 2, 3].into_iter().collect();
    /// let mut cursor = container.iter();
    /// cursor.restore_position(-7);
    /// assert_eq!(cursor.position(), Some(0));
    /// cursor.restore_position(99);
    /// assert_eq!(cursor.position(), Some(3));
    /// assert_eq!(cursor.next(), None);
    /// assert!(cursor.is_exhausted());
    /// ```
    pub fn restore_position(&mut self, restored: isize) {
        if let CursorState::Active { position, target } = &mut self.state {
            *position = restored.clamp(0, target.len() as isize) as usize;
        }
    }

    /// Counts the cells `next` will actually yield: the populated run ahead
    /// of the cursor, up to the first vacant cell.
    fn readable_remaining(&self) -> usize {
        let CursorState::Active { position, target } = &self.state else {
            return 0;
        };
        target.with_cells(|cells| match self.direction {
            Direction::Forward => cells
                .get(*position..)
                .map_or(0, |ahead| ahead.iter().take_while(|cell| cell.is_some()).count()),
            Direction::Backward => cells
                .get(..*position)
                .map_or(0, |ahead| ahead.iter().rev().take_while(|cell| cell.is_some()).count()),
        })
    }

    fn exhaust(&mut self) {
        // dropping the previous state releases the container
        self.state = CursorState::Exhausted;
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let CursorState::Active { position, target } = &mut self.state else {
            return None;
        };
        let index = match self.direction {
            Direction::Forward if *position < target.len() => *position,
            Direction::Backward if *position > 0 => *position - 1,
            _ => {
                self.exhaust();
                return None;
            }
        };
        match target.get_at(index) {
            Ok(element) => {
                match self.direction {
                    Direction::Forward => *position += 1,
                    Direction::Backward => *position -= 1,
                }
                Some(element)
            }
            Err(error) => {
                tracing::warn!(index, %error, "cursor stopped at a vacant cell");
                self.exhaust();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let readable = self.readable_remaining();
        (readable, Some(readable))
    }
}

impl<T: Clone> ExactSizeIterator for Cursor<T> {}

impl<T: Clone> FusedIterator for Cursor<T> {}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Cursor")
            .field("direction", &self.direction)
            .field("position", &self.position())
            .field("length_remaining", &self.length_remaining())
            .finish()
    }
}

// =============================================================================
// Container Entry Points
// =============================================================================

impl<T> SlotContainer<T> {
    /// Returns a forward cursor holding a new reference to this container.
    #[must_use]
    pub fn iter(&self) -> Cursor<T> {
        Cursor::new(self.clone())
    }

    /// Returns a reversed cursor holding a new reference to this container.
    #[must_use]
    pub fn iter_rev(&self) -> Cursor<T> {
        Cursor::new_reversed(self.clone())
    }
}

impl<T: Clone> IntoIterator for SlotContainer<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Cursor::new(self)
    }
}

impl<T: Clone> IntoIterator for &SlotContainer<T> {
    type Item = T;
    type IntoIter = Cursor<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_logging;
    use rstest::rstest;
    use std::rc::Rc;

    #[rstest]
    fn test_cursor_over_pair() {
        let container: SlotContainer<i32> = [1, 2].into_iter().collect();
        let mut cursor = container.iter();
        assert_eq!(cursor.next(), Some(1));
        assert_eq!(cursor.next(), Some(2));
        assert_eq!(cursor.length_remaining(), 0);
        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.next(), None);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.length_remaining(), 0);
    }

    #[rstest]
    fn test_exhaustion_releases_container() {
        let container: SlotContainer<i32> = [1].into_iter().collect();
        let mut cursor = container.iter();
        assert_eq!(Rc::strong_count(container.storage()), 2);
        cursor.by_ref().for_each(drop);
        assert_eq!(Rc::strong_count(container.storage()), 1);
        assert!(cursor.target().is_none());
    }

    #[rstest]
    fn test_restore_after_exhaustion_is_noop() {
        let container: SlotContainer<i32> = [1, 2].into_iter().collect();
        let mut cursor = container.iter();
        cursor.by_ref().for_each(drop);
        cursor.restore_position(0);
        assert_eq!(cursor.position(), None);
        assert_eq!(cursor.next(), None);
    }

    #[rstest]
    fn test_reversed_walks_backwards() {
        let container: SlotContainer<i32> = (1..=4).collect();
        let reversed: Vec<i32> = container.iter_rev().collect();
        assert_eq!(reversed, vec![4, 3, 2, 1]);
    }

    #[rstest]
    fn test_reversed_restore_counts_unread() {
        let container: SlotContainer<i32> = (1..=4).collect();
        let mut cursor = container.iter_rev();
        cursor.restore_position(2);
        assert_eq!(cursor.length_remaining(), 2);
        assert_eq!(cursor.collect::<Vec<_>>(), vec![2, 1]);
    }

    #[rstest]
    fn test_cursor_sees_later_mutation() {
        let container: SlotContainer<i32> = (1..=3).collect();
        let mut cursor = container.iter();
        assert_eq!(cursor.next(), Some(1));
        container.set(1, 20).unwrap();
        assert_eq!(cursor.next(), Some(20));
    }

    #[rstest]
    fn test_vacant_cell_exhausts_cursor() {
        init_test_logging();
        let container: SlotContainer<i32> = SlotContainer::create(3).unwrap();
        container.set(0, 1).unwrap();
        let mut cursor = container.iter();
        assert_eq!(cursor.next(), Some(1));
        assert_eq!(cursor.next(), None);
        assert!(cursor.is_exhausted());
    }

    #[rstest]
    fn test_for_loop_over_reference() {
        let container: SlotContainer<i32> = (1..=3).collect();
        let mut total = 0;
        for element in &container {
            total += element;
        }
        assert_eq!(total, 6);
        assert_eq!(container.iter().len(), 3);
    }
}
