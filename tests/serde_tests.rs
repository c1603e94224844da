#![cfg(feature = "serde")]

//! Integration tests for serde support in slotted.
//!
//! These tests verify that containers, kinds, descriptors and collector
//! configuration serialize and deserialize through JSON, and that a
//! container keeps its family across a round trip.

use rstest::rstest;
use slotted::prelude::*;

// =============================================================================
// SlotContainer
// =============================================================================

#[rstest]
fn test_container_json_roundtrip() {
    let container: SlotContainer<i32> = (1..=5).collect();
    let json = serde_json::to_string(&container).unwrap();
    assert_eq!(json, r#"{"family":"memoryslots","elements":[1,2,3,4,5]}"#);
    let restored: SlotContainer<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(container, restored);
    assert!(!container.is_same(&restored));
}

#[rstest]
fn test_nested_containers() {
    let inner: SlotContainer<String> = ["a", "b"].into_iter().map(String::from).collect();
    let outer: SlotContainer<SlotContainer<String>> = vec![inner.clone(), inner].into();
    let json = serde_json::to_string(&outer).unwrap();
    let inner_json = r#"{"family":"memoryslots","elements":["a","b"]}"#;
    assert_eq!(
        json,
        format!(r#"{{"family":"memoryslots","elements":[{inner_json},{inner_json}]}}"#)
    );
    let restored: SlotContainer<SlotContainer<String>> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.len(), 2);
    // deserialization never aliases
    assert!(!restored.get(0).unwrap().is_same(&restored.get(1).unwrap()));
}

#[rstest]
fn test_vacant_container_does_not_serialize() {
    let container: SlotContainer<i32> = SlotContainer::create(2).unwrap();
    let error = serde_json::to_string(&container).unwrap_err();
    assert!(error.to_string().contains("slot 0 is vacant"));
}

#[rstest]
#[case(SlotKind::MUTABLE_TUPLE)]
#[case(SlotKind::MEMORY_SLOTS)]
fn test_container_roundtrip_keeps_family(#[case] kind: SlotKind) {
    let container = SlotContainer::from_vec_with_kind(kind, vec![1, 2]);
    let json = serde_json::to_string(&container).unwrap();
    let restored: SlotContainer<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.kind(), kind);
    assert_eq!(restored, container);
}

#[rstest]
fn test_derived_kind_restores_as_family_base() {
    let point = SlotContainer::from_vec_with_kind(SlotKind::MUTABLE_TUPLE.derive("Point"), vec![3, 4]);
    let json = serde_json::to_string(&point).unwrap();
    assert_eq!(json, r#"{"family":"mutabletuple","elements":[3,4]}"#);
    let restored: SlotContainer<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.kind(), SlotKind::MUTABLE_TUPLE);
    assert_eq!(restored, point);
}

#[rstest]
fn test_container_accepts_field_order_and_sequence_form() {
    let reordered: SlotContainer<i32> =
        serde_json::from_str(r#"{"elements":[7],"family":"mutabletuple"}"#).unwrap();
    assert_eq!(reordered.kind(), SlotKind::MUTABLE_TUPLE);
    let compact: SlotContainer<i32> = serde_json::from_str(r#"["memoryslots",[7]]"#).unwrap();
    assert_eq!(compact, SlotContainer::from(vec![7]));
}

#[rstest]
#[case(r#"{"a":1}"#)]
#[case(r#"{"elements":[1]}"#)]
#[case(r#"{"family":"Point","elements":[1]}"#)]
#[case("[1,2]")]
fn test_malformed_container_is_rejected(#[case] json: &str) {
    let result: Result<SlotContainer<i32>, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

// =============================================================================
// Kinds and Descriptors
// =============================================================================

#[rstest]
#[case(SlotKind::MUTABLE_TUPLE, "\"mutabletuple\"")]
#[case(SlotKind::MEMORY_SLOTS, "\"memoryslots\"")]
fn test_builtin_kind_roundtrip(#[case] kind: SlotKind, #[case] json: &str) {
    assert_eq!(serde_json::to_string(&kind).unwrap(), json);
    assert_eq!(serde_json::from_str::<SlotKind>(json).unwrap(), kind);
}

#[rstest]
fn test_unknown_kind_is_rejected() {
    let error = serde_json::from_str::<SlotKind>("\"Point\"").unwrap_err();
    assert!(error.to_string().contains("unknown slot container kind `Point`"));
}

#[rstest]
fn test_reduction_roundtrip() {
    let container = SlotContainer::from_vec_with_kind(SlotKind::MUTABLE_TUPLE, vec![1, 2]);
    let json = serde_json::to_string(&container.reduce().unwrap()).unwrap();
    assert_eq!(json, r#"{"constructor":"mutabletuple","elements":[1,2]}"#);
    let reduction: Reduction<i32> = serde_json::from_str(&json).unwrap();
    let rebuilt = SlotContainer::reconstruct(reduction);
    assert_eq!(rebuilt.kind(), SlotKind::MUTABLE_TUPLE);
    assert_eq!(rebuilt, container);
}

#[rstest]
fn test_cursor_reduction_roundtrip() {
    let container: SlotContainer<i32> = (1..=4).collect();
    let mut cursor = container.iter();
    cursor.next();
    let json = serde_json::to_string(&cursor.checkpoint()).unwrap();
    assert_eq!(
        json,
        r#"{"constructor":"Forward","source":{"family":"memoryslots","elements":[1,2,3,4]},"position":1}"#
    );

    let reduction: CursorReduction<i32> = serde_json::from_str(&json).unwrap();
    let resumed: Vec<i32> = Cursor::reconstruct(reduction).collect();
    assert_eq!(resumed, vec![2, 3, 4]);
}

#[rstest]
fn test_exhausted_cursor_reduction() {
    let container: SlotContainer<i32> = (1..=2).collect();
    let mut cursor = container.iter_rev();
    cursor.by_ref().for_each(drop);
    let json = serde_json::to_string(&cursor.checkpoint()).unwrap();
    assert_eq!(
        json,
        r#"{"constructor":"Backward","source":{"family":"memoryslots","elements":[]},"position":null}"#
    );
}

// =============================================================================
// Configuration
// =============================================================================

#[rstest]
fn test_collector_config_defaults_missing_fields() {
    let config: CollectorConfig = serde_json::from_str(r#"{"threshold":10}"#).unwrap();
    assert_eq!(config, CollectorConfig::default().with_threshold(10));

    let empty: CollectorConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, CollectorConfig::default());
}

#[rstest]
fn test_compare_op_roundtrip() {
    for op in CompareOp::ALL {
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(serde_json::from_str::<CompareOp>(&json).unwrap(), op);
    }
}
