//! Lexicographic rich comparison.
//!
//! Two containers are compared by scanning index-wise from position 0 while
//! the elements are equal. If one side runs out first, the lengths decide.
//! Otherwise the first differing pair decides: `==` is `false`, `!=` is
//! `true`, and the ordering operators compare that pair.
//!
//! Elements are cloned out of the cell array before they are compared, so a
//! comparison routine is free to read or mutate either container.

use std::cmp::Ordering;

use super::SlotContainer;
use crate::error::SlotError;

/// A rich comparison operator.
///
/// # Examples
///
/// ```rust
/// use std::cmp::Ordering;
/// use slotted::slots::CompareOp;
///
/// assert!(CompareOp::LessEqual.matches(Ordering::Equal));
/// assert!(!CompareOp::Greater.matches(Ordering::Less));
/// assert!(CompareOp::NotEqual.matches(Ordering::Greater));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompareOp {
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
}

impl CompareOp {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Less,
        Self::LessEqual,
        Self::Equal,
        Self::NotEqual,
        Self::Greater,
        Self::GreaterEqual,
    ];

    /// Returns `true` if `ordering` satisfies this operator.
    #[must_use]
    pub const fn matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Less => ordering.is_lt(),
            Self::LessEqual => ordering.is_le(),
            Self::Equal => ordering.is_eq(),
            Self::NotEqual => ordering.is_ne(),
            Self::Greater => ordering.is_gt(),
            Self::GreaterEqual => ordering.is_ge(),
        }
    }

    /// Applies this operator to two partially ordered values.
    ///
    /// Incomparable values satisfy only `!=`.
    #[must_use]
    pub fn evaluate<U: PartialOrd + ?Sized>(self, left: &U, right: &U) -> bool {
        match left.partial_cmp(right) {
            Some(ordering) => self.matches(ordering),
            None => self == Self::NotEqual,
        }
    }

    /// Returns the operator with its operands swapped (`<` becomes `>`).
    #[must_use]
    pub const fn reflected(self) -> Self {
        match self {
            Self::Less => Self::Greater,
            Self::LessEqual => Self::GreaterEqual,
            Self::Greater => Self::Less,
            Self::GreaterEqual => Self::LessEqual,
            Self::Equal | Self::NotEqual => self,
        }
    }
}

/// Outcome of the common-prefix scan.
enum Scan<T> {
    /// One or both sides ran out without an unequal pair.
    Prefix,
    /// The first unequal pair.
    Differ(T, T),
}

fn scan<T, E, L, R, F>(
    lengths: (usize, usize),
    mut left: L,
    mut right: R,
    mut equal: F,
) -> Result<Scan<T>, E>
where
    E: From<SlotError>,
    L: FnMut(usize) -> Result<T, SlotError>,
    R: FnMut(usize) -> Result<T, SlotError>,
    F: FnMut(&T, &T) -> Result<bool, E>,
{
    for position in 0..lengths.0.min(lengths.1) {
        let left_element = left(position)?;
        let right_element = right(position)?;
        if !equal(&left_element, &right_element)? {
            return Ok(Scan::Differ(left_element, right_element));
        }
    }
    Ok(Scan::Prefix)
}

fn decide<T, E, O>(
    outcome: Scan<T>,
    lengths: (usize, usize),
    op: CompareOp,
    mut order: O,
) -> Result<bool, E>
where
    O: FnMut(&T, &T, CompareOp) -> Result<bool, E>,
{
    match outcome {
        Scan::Prefix => Ok(op.matches(lengths.0.cmp(&lengths.1))),
        Scan::Differ(_, _) if op == CompareOp::Equal => Ok(false),
        Scan::Differ(_, _) if op == CompareOp::NotEqual => Ok(true),
        Scan::Differ(left, right) => order(&left, &right, op),
    }
}

impl<T: Clone> SlotContainer<T> {
    /// Compares with caller-supplied element routines that may fail.
    ///
    /// `equal` drives the common-prefix scan; `order` decides an ordering
    /// operator on the first differing pair. Returns `Ok(None)` when `other`
    /// is not a compatible kind and the caller must fall back to its own
    /// ordering. Any error from either routine aborts the comparison.
    ///
    /// # Errors
    ///
    /// Returns the first error of `equal` or `order`, or
    /// [`SlotError::Vacant`] (converted into `E`) if a scanned cell is vacant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::{CompareOp, SlotContainer};
    ///
    /// let left: SlotContainer<&str> = ["a", "B"].into_iter().collect();
    /// let right: SlotContainer<&str> = ["A", "b"].into_iter().collect();
    /// let ignoring_case = left.compare_by::<slotted::error::SlotError, _, _>(
    ///     &right,
    ///     CompareOp::Equal,
    ///     |a, b| Ok(a.eq_ignore_ascii_case(b)),
    ///     |a, b, op| Ok(op.evaluate(&a.to_lowercase(), &b.to_lowercase())),
    /// );
    /// assert_eq!(ignoring_case, Ok(Some(true)));
    /// ```
    pub fn compare_by<E, F, O>(
        &self,
        other: &Self,
        op: CompareOp,
        equal: F,
        order: O,
    ) -> Result<Option<bool>, E>
    where
        E: From<SlotError>,
        F: FnMut(&T, &T) -> Result<bool, E>,
        O: FnMut(&T, &T, CompareOp) -> Result<bool, E>,
    {
        if !self.kind().is_compatible_with(other.kind()) {
            return Ok(None);
        }
        let lengths = (self.len(), other.len());
        let outcome = scan(
            lengths,
            |position| self.get_at(position),
            |position| other.get_at(position),
            equal,
        )?;
        decide(outcome, lengths, op, order).map(Some)
    }
}

impl<T: Clone + PartialOrd> SlotContainer<T> {
    /// Compares two containers lexicographically under `op`.
    ///
    /// Returns `Ok(None)` if `other` belongs to a different family.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Vacant`] if a scanned cell is vacant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::{CompareOp, SlotContainer, SlotKind};
    ///
    /// let shorter: SlotContainer<i32> = [1, 2].into_iter().collect();
    /// let longer: SlotContainer<i32> = [1, 2, 0].into_iter().collect();
    /// assert_eq!(shorter.rich_compare(&longer, CompareOp::Less), Ok(Some(true)));
    ///
    /// let other_family = SlotContainer::from_vec_with_kind(SlotKind::MUTABLE_TUPLE, vec![1, 2]);
    /// assert_eq!(shorter.rich_compare(&other_family, CompareOp::Equal), Ok(None));
    /// ```
    pub fn rich_compare(&self, other: &Self, op: CompareOp) -> Result<Option<bool>, SlotError> {
        self.compare_by(
            other,
            op,
            |left, right| Ok(left == right),
            |left, right, op| Ok(op.evaluate(left, right)),
        )
    }

    /// Compares against a plain ordered sequence, regardless of kind.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::Vacant`] if a scanned cell is vacant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slotted::slots::{CompareOp, SlotContainer};
    ///
    /// let container: SlotContainer<i32> = [1, 5].into_iter().collect();
    /// assert_eq!(container.compare_sequence(&[1, 4, 9], CompareOp::Greater), Ok(true));
    /// ```
    pub fn compare_sequence(&self, other: &[T], op: CompareOp) -> Result<bool, SlotError> {
        let lengths = (self.len(), other.len());
        let outcome = scan(
            lengths,
            |position| self.get_at(position),
            |position| Ok(other[position].clone()),
            |left, right| Ok::<_, SlotError>(left == right),
        )?;
        decide(outcome, lengths, op, |left, right, op| {
            Ok(op.evaluate(left, right))
        })
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

/// Element-wise equality. Containers of different families, and containers
/// with a vacant cell inside the compared prefix, are never equal.
impl<T: Clone + PartialEq> PartialEq for SlotContainer<T> {
    fn eq(&self, other: &Self) -> bool {
        // `==` never reaches the ordering routine
        let result = self.compare_by::<SlotError, _, _>(
            other,
            CompareOp::Equal,
            |left, right| Ok(left == right),
            |_, _, _| Ok(false),
        );
        matches!(result, Ok(Some(true)))
    }
}

impl<T: Clone + PartialOrd> PartialOrd for SlotContainer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.kind().is_compatible_with(other.kind()) {
            return None;
        }
        let lengths = (self.len(), other.len());
        let outcome = scan(
            lengths,
            |position| self.get_at(position),
            |position| other.get_at(position),
            |left, right| Ok::<_, SlotError>(left == right),
        )
        .ok()?;
        match outcome {
            Scan::Prefix => Some(lengths.0.cmp(&lengths.1)),
            Scan::Differ(left, right) => left.partial_cmp(&right),
        }
    }
}
