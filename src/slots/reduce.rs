//! Reconstruction descriptors.
//!
//! A container reduces to its constructor plus a plain ordered snapshot of
//! its elements, never the live container. A cursor reduces to its direction,
//! its source container and its resume point; an exhausted cursor reduces to
//! an empty source and no position.
//!
//! With the `serde` feature, containers serialize as their builtin family
//! plus the element sequence, and both descriptors derive
//! `Serialize`/`Deserialize`. A derived kind comes back as its family's base
//! kind, which compares equal to it.

use super::{Cursor, Direction, SlotContainer, SlotKind};
use crate::error::SlotError;

/// Constructor and element snapshot of a [`SlotContainer`].
///
/// # Examples
///
/// ```rust
/// use slotted::slots::{SlotContainer, SlotKind};
///
/// let source: SlotContainer<i32> = [1, 2, 3].into_iter().collect();
/// let reduction = source.reduce().unwrap();
/// assert_eq!(reduction.constructor, SlotKind::MEMORY_SLOTS);
/// assert_eq!(reduction.elements, vec![1, 2, 3]);
///
/// let rebuilt = reduction.rebuild();
/// assert_eq!(rebuilt, source);
/// assert!(!rebuilt.is_same(&source));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reduction<T> {
    /// Kind to construct.
    pub constructor: SlotKind,
    /// Elements in order.
    pub elements: Vec<T>,
}

impl<T> Reduction<T> {
    /// Builds a new container from this descriptor.
    #[must_use]
    pub fn rebuild(self) -> SlotContainer<T> {
        SlotContainer::from_vec_with_kind(self.constructor, self.elements)
    }
}

/// Constructor, source and resume point of a [`Cursor`].
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "T: serde::Serialize + Clone",
        deserialize = "T: serde::Deserialize<'de>"
    ))
)]
pub struct CursorReduction<T> {
    /// Direction of the cursor to construct.
    pub constructor: Direction,
    /// Container to walk; empty for an exhausted cursor.
    pub source: SlotContainer<T>,
    /// Resume point; `None` for an exhausted cursor.
    pub position: Option<usize>,
}

impl<T: Clone> SlotContainer<T> {
    /// Reduces this container to a [`Reduction`].
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Vacant`] if any cell is vacant.
    pub fn reduce(&self) -> Result<Reduction<T>, SlotError> {
        Ok(Reduction {
            constructor: self.kind(),
            elements: self.to_vec()?,
        })
    }
}

impl<T> SlotContainer<T> {
    /// Builds a container from a [`Reduction`].
    #[must_use]
    pub fn reconstruct(reduction: Reduction<T>) -> Self {
        reduction.rebuild()
    }
}

impl<T> Cursor<T> {
    /// Reduces this cursor to a [`CursorReduction`].
    ///
    /// The source is shared with the cursor, not copied. Named apart from
    /// [`Iterator::reduce`], which would otherwise win method resolution.
    ///
    /// ```rust
    /// use slotted::slots::{Cursor, SlotContainer};
    ///
    /// let container: SlotContainer<i32> = (1..=3).collect();
    /// let mut cursor = container.iter();
    /// cursor.next();
    ///
    /// let mut resumed = Cursor::reconstruct(cursor.checkpoint());
    /// assert_eq!(resumed.next(), Some(2));
    /// ```
    #[must_use]
    pub fn checkpoint(&self) -> CursorReduction<T> {
        match (self.target(), self.position()) {
            (Some(target), Some(position)) => CursorReduction {
                constructor: self.direction(),
                source: target.clone(),
                position: Some(position),
            },
            _ => CursorReduction {
                constructor: self.direction(),
                source: SlotContainer::default(),
                position: None,
            },
        }
    }

    /// Builds a cursor from a [`CursorReduction`], restoring its position.
    #[must_use]
    pub fn reconstruct(reduction: CursorReduction<T>) -> Self {
        let mut cursor = Self::with_direction(reduction.source, reduction.constructor);
        if let Some(position) = reduction.position {
            cursor.restore_position(isize::try_from(position).unwrap_or(isize::MAX));
        }
        cursor
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
const CONTAINER_FIELDS: &[&str] = &["family", "elements"];

#[cfg(feature = "serde")]
impl<T: serde::Serialize + Clone> serde::Serialize for SlotContainer<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{Error, SerializeStruct};

        let elements = self.to_vec().map_err(S::Error::custom)?;
        let mut state = serializer.serialize_struct("SlotContainer", CONTAINER_FIELDS.len())?;
        state.serialize_field("family", &self.kind().base())?;
        state.serialize_field("elements", &elements)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum ContainerField {
    Family,
    Elements,
}

#[cfg(feature = "serde")]
struct SlotContainerVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> SlotContainerVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for SlotContainerVisitor<T>
where
    T: serde::Deserialize<'de>,
{
    type Value = SlotContainer<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a slot container with a family and elements")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        use serde::de::Error;

        let family: SlotKind = seq
            .next_element()?
            .ok_or_else(|| A::Error::invalid_length(0, &self))?;
        let elements: Vec<T> = seq
            .next_element()?
            .ok_or_else(|| A::Error::invalid_length(1, &self))?;
        Ok(SlotContainer::from_vec_with_kind(family, elements))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        use serde::de::Error;

        let mut family: Option<SlotKind> = None;
        let mut elements: Option<Vec<T>> = None;
        while let Some(field) = map.next_key()? {
            match field {
                ContainerField::Family => {
                    if family.is_some() {
                        return Err(A::Error::duplicate_field("family"));
                    }
                    family = Some(map.next_value()?);
                }
                ContainerField::Elements => {
                    if elements.is_some() {
                        return Err(A::Error::duplicate_field("elements"));
                    }
                    elements = Some(map.next_value()?);
                }
            }
        }
        let family = family.ok_or_else(|| A::Error::missing_field("family"))?;
        let elements = elements.ok_or_else(|| A::Error::missing_field("elements"))?;
        Ok(SlotContainer::from_vec_with_kind(family, elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for SlotContainer<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_struct("SlotContainer", CONTAINER_FIELDS, SlotContainerVisitor::new())
    }
}
