//! Tests for the fixed-index field accessor.

use rstest::rstest;
use slotted::prelude::*;

struct Point {
    x: FieldAccessor,
    y: FieldAccessor,
}

impl Point {
    fn layout() -> Self {
        Self {
            x: FieldAccessor::bind_index(0).unwrap(),
            y: FieldAccessor::bind_index(1).unwrap(),
        }
    }
}

#[rstest]
fn test_accessors_read_and_write_their_cells() {
    let layout = Point::layout();
    let point = SlotContainer::from_vec_with_kind(SlotKind::MUTABLE_TUPLE.derive("Point"), vec![1, 2]);

    assert_eq!(layout.x.get(Some(&point)), Ok(Accessed::Value(1)));
    layout.y.set(Some(&point), Some(20)).unwrap();
    assert_eq!(point.to_vec().unwrap(), vec![1, 20]);
}

#[rstest]
fn test_accessor_is_not_bound_to_one_instance() {
    let layout = Point::layout();
    let first: SlotContainer<i32> = vec![1, 2].into();
    let second: SlotContainer<i32> = vec![3, 4].into();
    assert_eq!(layout.y.get(Some(&first)).unwrap().into_value(), Some(2));
    assert_eq!(layout.y.get(Some(&second)).unwrap().into_value(), Some(4));
}

#[rstest]
fn test_descriptor_mode_returns_the_accessor() {
    let layout = Point::layout();
    let accessed = layout.x.get::<i32>(None).unwrap();
    assert_eq!(accessed.as_descriptor(), Some(&layout.x));
    assert_eq!(accessed.into_value(), None);
}

#[rstest]
#[case(-1_i64)]
#[case(i64::MIN)]
fn test_bind_rejects_negative_indices(#[case] index: i64) {
    assert_eq!(
        FieldAccessor::bind_index(index),
        Err(SlotError::InvalidIndex {
            reason: "not representable as a cell index"
        })
    );
}

#[rstest]
fn test_deleting_a_field_is_unsupported() {
    let layout = Point::layout();
    let point: SlotContainer<i32> = vec![1, 2].into();
    let error = layout.x.set(Some(&point), None).unwrap_err();
    assert_eq!(error.to_string(), "field deletion is not supported by slot containers");
    assert_eq!(point.get(0), Ok(1));
}

#[rstest]
fn test_set_on_vacant_cell_populates_it() {
    let layout = Point::layout();
    let point: SlotContainer<String> = SlotContainer::create(2).unwrap();
    layout.x.set(Some(&point), Some("x".to_string())).unwrap();
    layout.y.set(Some(&point), Some("y".to_string())).unwrap();
    assert!(point.is_populated());
}
