//! Container kinds and the allocation factory used by range operations.
//!
//! A [`SlotKind`] names the concrete variant of a container and the family
//! it belongs to. The two builtin families, `mutabletuple` and
//! `memoryslots`, share one implementation and differ only in name; derived
//! kinds model record-like variants built on top of a family.
//!
//! # Examples
//!
//! ```rust
//! use slotted::slots::SlotKind;
//!
//! let point = SlotKind::MEMORY_SLOTS.derive("Point");
//! assert!(!point.is_exact());
//! assert!(point.is_compatible_with(SlotKind::MEMORY_SLOTS));
//! assert!(!point.is_compatible_with(SlotKind::MUTABLE_TUPLE));
//! assert_eq!(point.base(), SlotKind::MEMORY_SLOTS);
//! ```

use std::fmt;

use super::SlotContainer;
use super::storage::allocate_cells;
use crate::error::SlotError;

/// The concrete variant of a slot container.
///
/// Kinds are plain values: two kinds are equal when both their name and
/// their family are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKind {
    /// Name of the concrete variant
    name: &'static str,
    /// Name of the family's base variant
    family: &'static str,
}

impl SlotKind {
    /// The `mutabletuple` family base kind.
    pub const MUTABLE_TUPLE: Self = Self {
        name: "mutabletuple",
        family: "mutabletuple",
    };

    /// The `memoryslots` family base kind.
    pub const MEMORY_SLOTS: Self = Self {
        name: "memoryslots",
        family: "memoryslots",
    };

    /// Returns a derived kind with the given name in this kind's family.
    #[inline]
    #[must_use]
    pub const fn derive(self, name: &'static str) -> Self {
        Self {
            name,
            family: self.family,
        }
    }

    /// Returns the name of the concrete variant.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns the name of the family this kind belongs to.
    #[inline]
    #[must_use]
    pub const fn family(self) -> &'static str {
        self.family
    }

    /// Returns the family's base kind.
    #[inline]
    #[must_use]
    pub const fn base(self) -> Self {
        Self {
            name: self.family,
            family: self.family,
        }
    }

    /// Returns `true` if this is the family's base kind rather than a
    /// derived one.
    ///
    /// Only exact kinds may answer a full-range slice with the same instance.
    #[inline]
    #[must_use]
    pub fn is_exact(self) -> bool {
        self.name == self.family
    }

    /// Returns `true` if containers of both kinds may be concatenated and
    /// compared with each other.
    #[inline]
    #[must_use]
    pub fn is_compatible_with(self, other: Self) -> bool {
        self.family == other.family
    }

    /// Looks up a builtin family base kind by name.
    ///
    /// ```rust
    /// use slotted::slots::SlotKind;
    ///
    /// assert_eq!(SlotKind::builtin("mutabletuple"), Some(SlotKind::MUTABLE_TUPLE));
    /// assert_eq!(SlotKind::builtin("Point"), None);
    /// ```
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        [Self::MUTABLE_TUPLE, Self::MEMORY_SLOTS]
            .into_iter()
            .find(|kind| kind.name == name)
    }
}

impl Default for SlotKind {
    #[inline]
    fn default() -> Self {
        Self::MEMORY_SLOTS
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name)
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Allocation capability used by operations that derive new containers.
///
/// Slicing, concatenation and repetition never hardcode the variant they
/// produce; they ask the source container's kind for a factory. A
/// [`SlotKind`] is its own factory and produces its family's base kind, so a
/// slice of a derived record is a plain container of the same family.
pub trait SlotFactory {
    /// The kind of the containers this factory produces.
    fn result_kind(&self) -> SlotKind;

    /// Allocates a container of `length` vacant cells.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Allocation`] if the size overflows or cannot be
    /// allocated.
    fn allocate<T>(&self, length: usize) -> Result<SlotContainer<T>, SlotError> {
        SlotContainer::create_with_kind(self.result_kind(), length)
    }

    /// Wraps fully populated elements into a container.
    fn assemble<T>(&self, elements: Vec<T>) -> SlotContainer<T> {
        SlotContainer::from_vec_with_kind(self.result_kind(), elements)
    }

    /// Reserves room for `length` elements that are about to be assembled.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Allocation`] if the size overflows or cannot be
    /// allocated.
    fn reserve<T>(&self, length: usize) -> Result<Vec<T>, SlotError> {
        allocate_cells::<T>(length)
    }
}

impl SlotFactory for SlotKind {
    #[inline]
    fn result_kind(&self) -> SlotKind {
        self.base()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for SlotKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SlotKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::builtin(&name).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown slot container kind `{name}`"))
        })
    }
}
