//! Property-based tests for SlotContainer laws.
//!
//! Containers are checked against `Vec` as a model: every operation must
//! agree with the equivalent slice operation.

use proptest::prelude::*;
use slotted::prelude::*;

fn model_slice(elements: &[i32], low: isize, high: isize) -> Vec<i32> {
    let range = SliceRange::clamp(low, high, elements.len());
    elements[range.start()..range.stop()].to_vec()
}

/// Strided index sequence computed by walking the bounds directly.
fn model_strided_indices(
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
    length: usize,
) -> Vec<usize> {
    let length = length as isize;
    let (lower, upper) = if step < 0 { (-1, length - 1) } else { (0, length) };
    let resolve = |bound: Option<isize>, default: isize| {
        let Some(mut bound) = bound else {
            return default;
        };
        if bound < 0 {
            bound += length;
            if bound < 0 {
                bound = lower;
            }
        } else if bound >= length {
            bound = upper;
        }
        bound
    };
    let (mut index, stop) = if step < 0 {
        (resolve(start, upper), resolve(stop, lower))
    } else {
        (resolve(start, lower), resolve(stop, upper))
    };

    let mut indices = Vec::new();
    while (step > 0 && index < stop) || (step < 0 && index > stop) {
        indices.push(index as usize);
        index += step;
    }
    indices
}

proptest! {
    /// Set-Get Law: a value written at an index is read back from it
    #[test]
    fn prop_set_get_law(
        elements in prop::collection::vec(any::<i32>(), 1..50),
        raw_index in any::<isize>(),
        value: i32
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let length = elements.len() as isize;
        let index = raw_index.rem_euclid(2 * length) - length;

        container.set(index, value).unwrap();
        prop_assert_eq!(container.get(index), Ok(value));
    }

    /// Set-Other Law: writing one cell never changes another
    #[test]
    fn prop_set_does_not_touch_other_cells(
        elements in prop::collection::vec(any::<i32>(), 2..50),
        seed in any::<usize>()
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let target = seed % elements.len();
        container.set(target as isize, 0).unwrap();
        for (position, expected) in elements.iter().enumerate() {
            if position != target {
                prop_assert_eq!(container.get(position as isize), Ok(*expected));
            }
        }
    }

    /// Slice Law: slicing agrees with the clamped slice of the model
    #[test]
    fn prop_slice_matches_model(
        elements in prop::collection::vec(any::<i32>(), 0..40),
        low in -60_isize..60,
        high in -60_isize..60
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let sliced = container.slice(low, high).unwrap();
        prop_assert_eq!(sliced.to_vec().unwrap(), model_slice(&elements, low, high));
    }

    /// Strided Law: strided reads agree with the model's index sequence
    #[test]
    fn prop_strided_matches_model(
        elements in prop::collection::vec(any::<i32>(), 0..40),
        start in prop::option::of(-60_isize..60),
        stop in prop::option::of(-60_isize..60),
        step in prop_oneof![-7_isize..0, 1_isize..8]
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let indices = model_strided_indices(start, stop, step, elements.len());
        let expected: Vec<i32> = indices.iter().map(|&position| elements[position]).collect();
        let range = StrideRange::new(start, stop, Some(step), elements.len()).unwrap();
        prop_assert_eq!(range.len(), indices.len());
        prop_assert_eq!(range.indices().collect::<Vec<_>>(), indices);
        let strided = container.get_strided(start, stop, Some(step)).unwrap();
        prop_assert_eq!(strided.to_vec().unwrap(), expected);
    }

    /// Slice-Assign Law: assigning a matching count replaces exactly that range
    #[test]
    fn prop_slice_assign_matches_model(
        elements in prop::collection::vec(any::<i32>(), 0..40),
        low in -60_isize..60,
        high in -60_isize..60,
        fill: i32
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let range = SliceRange::clamp(low, high, elements.len());
        container
            .slice_assign(low, high, std::iter::repeat_n(fill, range.len()))
            .unwrap();

        let mut model = elements.clone();
        model[range.start()..range.stop()].fill(fill);
        prop_assert_eq!(container.to_vec().unwrap(), model);
    }

    /// Atomicity Law: a count mismatch leaves the container unchanged
    #[test]
    fn prop_slice_assign_mismatch_is_atomic(
        elements in prop::collection::vec(any::<i32>(), 0..40),
        low in -60_isize..60,
        high in -60_isize..60,
        extra in 1_usize..4
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let range = SliceRange::clamp(low, high, elements.len());
        let result = container.slice_assign(low, high, vec![0; range.len() + extra]);
        prop_assert_eq!(
            result,
            Err(SlotError::LengthMismatch {
                expected: range.len(),
                actual: range.len() + extra
            })
        );
        prop_assert_eq!(container.to_vec().unwrap(), elements);
    }

    /// Concat Law: length and contents add up
    #[test]
    fn prop_concat_matches_model(
        left in prop::collection::vec(any::<i32>(), 0..30),
        right in prop::collection::vec(any::<i32>(), 0..30)
    ) {
        let joined = SlotContainer::from(left.clone())
            .concat(&SlotContainer::from(right.clone()))
            .unwrap();
        let model: Vec<i32> = left.into_iter().chain(right).collect();
        prop_assert_eq!(joined.len(), model.len());
        prop_assert_eq!(joined.to_vec().unwrap(), model);
    }

    /// Repeat Law: repetition tiles the elements `max(n, 0)` times
    #[test]
    fn prop_repeat_matches_model(
        elements in prop::collection::vec(any::<i32>(), 0..10),
        count in -3_isize..6
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let repeated = container.repeat(count).unwrap();
        let model = elements.repeat(count.max(0) as usize);
        prop_assert_eq!(repeated.to_vec().unwrap(), model);
    }

    /// Comparison Law: rich comparison agrees with slice ordering
    #[test]
    fn prop_comparison_matches_model(
        left in prop::collection::vec(0_i32..4, 0..6),
        right in prop::collection::vec(0_i32..4, 0..6)
    ) {
        let ordering = left.cmp(&right);
        let left_container = SlotContainer::from(left);
        let right_container = SlotContainer::from(right);
        for op in CompareOp::ALL {
            prop_assert_eq!(
                left_container.rich_compare(&right_container, op),
                Ok(Some(op.matches(ordering)))
            );
        }
    }

    /// Cursor Law: a cursor yields exactly the elements, then stays exhausted
    #[test]
    fn prop_cursor_yields_elements(
        elements in prop::collection::vec(any::<i32>(), 0..30)
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let mut cursor = container.iter();
        let yielded: Vec<i32> = cursor.by_ref().collect();
        prop_assert_eq!(&yielded, &elements);
        prop_assert_eq!(cursor.next(), None);
        prop_assert!(cursor.is_exhausted());

        let reversed: Vec<i32> = container.iter_rev().collect();
        let mut model = elements;
        model.reverse();
        prop_assert_eq!(reversed, model);
    }

    /// Restore Law: restoring any position resumes from the clamped index
    #[test]
    fn prop_restore_position_resumes(
        elements in prop::collection::vec(any::<i32>(), 0..30),
        restored in -40_isize..40
    ) {
        let container: SlotContainer<i32> = elements.iter().copied().collect();
        let mut cursor = container.iter();
        cursor.restore_position(restored);
        let start = restored.clamp(0, elements.len() as isize) as usize;
        prop_assert_eq!(cursor.length_remaining(), elements.len() - start);
        prop_assert_eq!(cursor.collect::<Vec<_>>(), elements[start..].to_vec());
    }
}
