//! Fixed-index field accessor.
//!
//! A [`FieldAccessor`] lets an attribute-binding layer expose container cells
//! as named fields. It remembers only an index and is applied to whichever
//! container the layer passes in. Passing no container models access through
//! the type rather than an instance.

use std::fmt;

use super::SlotContainer;
use crate::error::SlotError;

/// A stateless get/set adaptor over one fixed cell index.
///
/// # Examples
///
/// ```rust
/// use slotted::slots::{Accessed, FieldAccessor, SlotContainer};
///
/// let y = FieldAccessor::bind_index(1).unwrap();
/// let point: SlotContainer<i32> = [3, 4].into_iter().collect();
///
/// assert_eq!(y.get(Some(&point)), Ok(Accessed::Value(4)));
/// y.set(Some(&point), Some(40)).unwrap();
/// assert_eq!(point.get(1), Ok(40));
///
/// // Without an instance the accessor describes itself
/// assert_eq!(y.get::<i32>(None), Ok(Accessed::Descriptor(&y)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAccessor {
    index: usize,
}

/// Result of [`FieldAccessor::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessed<'a, T> {
    /// No instance was given; the accessor itself.
    Descriptor(&'a FieldAccessor),
    /// The element stored at the accessor's index.
    Value(T),
}

impl<'a, T> Accessed<'a, T> {
    /// Returns the element, or `None` in descriptor mode.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Descriptor(_) => None,
        }
    }

    /// Returns the accessor in descriptor mode.
    #[must_use]
    pub const fn as_descriptor(&self) -> Option<&'a FieldAccessor> {
        match self {
            Self::Descriptor(accessor) => Some(*accessor),
            Self::Value(_) => None,
        }
    }
}

impl FieldAccessor {
    /// Binds an accessor to `index`.
    ///
    /// The index is not checked against any container; the binding layer is
    /// responsible for matching it to the container shape.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidIndex`] if `index` is not representable as
    /// a cell index (for example a negative integer).
    ///
    /// ```rust
    /// use slotted::error::SlotError;
    /// use slotted::slots::FieldAccessor;
    ///
    /// assert_eq!(FieldAccessor::bind_index(2u8).unwrap().index(), 2);
    /// assert!(matches!(
    ///     FieldAccessor::bind_index(-1i64),
    ///     Err(SlotError::InvalidIndex { .. })
    /// ));
    /// ```
    pub fn bind_index<I>(index: I) -> Result<Self, SlotError>
    where
        I: TryInto<usize>,
    {
        let index = index.try_into().map_err(|_| SlotError::InvalidIndex {
            reason: "not representable as a cell index",
        })?;
        Ok(Self { index })
    }

    /// Returns the bound index.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    fn signed_index(&self) -> Result<isize, SlotError> {
        isize::try_from(self.index).map_err(|_| SlotError::InvalidIndex {
            reason: "exceeds the largest addressable cell",
        })
    }

    /// Reads the bound field.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Index`] if the index is outside the container,
    /// or [`SlotError::Vacant`] if the cell is vacant.
    pub fn get<'a, T: Clone>(
        &'a self,
        container: Option<&SlotContainer<T>>,
    ) -> Result<Accessed<'a, T>, SlotError> {
        match container {
            None => Ok(Accessed::Descriptor(self)),
            Some(container) => container.get(self.signed_index()?).map(Accessed::Value),
        }
    }

    /// Replaces the bound field with `value`.
    ///
    /// Without a container this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Unsupported`] if `value` is `None`, since fields
    /// of a fixed-shape container cannot be deleted, and [`SlotError::Index`]
    /// if the index is outside the container.
    pub fn set<T>(&self, container: Option<&SlotContainer<T>>, value: Option<T>) -> Result<(), SlotError> {
        let Some(value) = value else {
            return Err(SlotError::Unsupported {
                operation: "field deletion",
            });
        };
        match container {
            None => Ok(()),
            Some(container) => container.set(self.signed_index()?, value),
        }
    }
}

impl fmt::Display for FieldAccessor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "field[{}]", self.index)
    }
}
