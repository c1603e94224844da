//! Tests for cursors and their checkpoint/restore contract.

use rstest::rstest;
use slotted::prelude::*;

fn container(values: &[i32]) -> SlotContainer<i32> {
    values.iter().copied().collect()
}

#[rstest]
fn test_cursor_scenario() {
    let pair = container(&[1, 2]);
    let mut cursor = pair.iter();
    assert_eq!(cursor.next(), Some(1));
    assert_eq!(cursor.next(), Some(2));
    assert_eq!(cursor.next(), None);
    assert_eq!(cursor.length_remaining(), 0);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
fn test_next_length_times_then_exhausted(#[case] length: i32) {
    let source: SlotContainer<i32> = (0..length).collect();
    let mut cursor = source.iter();
    for expected in 0..length {
        assert_eq!(cursor.next(), Some(expected));
    }
    for _ in 0..3 {
        assert_eq!(cursor.next(), None);
        assert!(cursor.is_exhausted());
    }
}

#[rstest]
fn test_length_remaining_counts_down() {
    let source = container(&[1, 2, 3]);
    let mut cursor = source.iter();
    let mut seen = Vec::new();
    while cursor.length_remaining() > 0 {
        seen.push(cursor.length_remaining());
        cursor.next();
    }
    assert_eq!(seen, vec![3, 2, 1]);
}

#[rstest]
#[case(-1, 0)]
#[case(2, 2)]
#[case(3, 3)]
#[case(40, 3)]
fn test_restore_position_clamps(#[case] restored: isize, #[case] expected: usize) {
    let source = container(&[1, 2, 3]);
    let mut cursor = source.iter();
    cursor.restore_position(restored);
    assert_eq!(cursor.position(), Some(expected));
    assert_eq!(cursor.length_remaining(), 3 - expected);
}

#[rstest]
fn test_restore_to_length_re_exhausts_without_reading() {
    let source: SlotContainer<i32> = SlotContainer::create(2).unwrap();
    let mut cursor = source.iter();
    cursor.restore_position(2);
    // vacant cells are never read
    assert_eq!(cursor.next(), None);
    assert!(cursor.is_exhausted());
}

#[rstest]
fn test_checkpoint_resume() {
    let source = container(&[5, 6, 7, 8]);
    let mut cursor = source.iter();
    cursor.next();
    let checkpoint = cursor.checkpoint();

    let consumed: Vec<i32> = cursor.collect();
    assert_eq!(consumed, vec![6, 7, 8]);

    let replayed: Vec<i32> = Cursor::reconstruct(checkpoint).collect();
    assert_eq!(replayed, vec![6, 7, 8]);
}

#[rstest]
fn test_reversed_cursor_position_counts_unread() {
    let source = container(&[1, 2, 3]);
    let mut cursor = source.iter_rev();
    assert_eq!(cursor.direction(), Direction::Backward);
    assert_eq!(cursor.position(), Some(3));
    assert_eq!(cursor.next(), Some(3));
    assert_eq!(cursor.position(), Some(2));
    cursor.restore_position(0);
    assert_eq!(cursor.next(), None);
    assert!(cursor.is_exhausted());
}

#[rstest]
fn test_cursor_keeps_container_alive() {
    let mut cursor = container(&[1, 2]).iter();
    assert_eq!(cursor.next(), Some(1));
    assert_eq!(cursor.target().map(SlotContainer::len), Some(2));
    assert_eq!(cursor.next(), Some(2));
}

#[rstest]
fn test_into_iterator_by_value_and_reference() {
    let source = container(&[1, 2, 3]);
    let doubled: Vec<i32> = (&source).into_iter().map(|element| element * 2).collect();
    assert_eq!(doubled, vec![2, 4, 6]);
    let owned: Vec<i32> = source.into_iter().collect();
    assert_eq!(owned, vec![1, 2, 3]);
}

#[rstest]
fn test_size_hint_matches_remaining() {
    let source = container(&[1, 2, 3]);
    let mut cursor = source.iter();
    cursor.next();
    assert_eq!(cursor.size_hint(), (2, Some(2)));
    assert_eq!(cursor.len(), 2);
}

#[rstest]
#[case(Direction::Forward, 1)]
#[case(Direction::Backward, 0)]
fn test_len_stops_at_first_vacant_cell(#[case] direction: Direction, #[case] readable: usize) {
    let source: SlotContainer<i32> = SlotContainer::create(3).unwrap();
    source.set(0, 10).unwrap();
    let cursor = Cursor::with_direction(source, direction);
    assert_eq!(cursor.length_remaining(), 3);
    assert_eq!(cursor.len(), readable);
    assert_eq!(cursor.count(), readable);
}

#[rstest]
fn test_len_tracks_cells_cleared_mid_walk() {
    let source = container(&[1, 2, 3, 4]);
    let mut cursor = source.iter();
    assert_eq!(cursor.len(), 4);
    source.clear();
    assert_eq!(cursor.len(), 0);
    assert_eq!(cursor.next(), None);
}

#[rstest]
fn test_iterator_reduce_folds_elements() {
    let source = container(&[1, 2, 3, 4]);
    assert_eq!(source.iter().reduce(|total, element| total + element), Some(10));
    assert_eq!(source.iter().checkpoint().position, Some(0));
}
