//! Iterator protocol tests against a live map.

use tablemap::prelude::*;
use tempfile::TempDir;

fn s(v: &str) -> String {
    v.to_string()
}

fn populated_map() -> (TableMap<String, String>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default()
        .with_filename(dir.path().join("iter.db").to_string_lossy().into_owned());
    let map = TableMap::open(config).unwrap();
    map.set(&s("k1"), &s("v1")).unwrap();
    map.set(&s("k2"), &s("v2")).unwrap();
    map.set(&s("k3"), &s("v3")).unwrap();
    (map, dir)
}

#[test]
fn forward_iteration_follows_insertion_order() {
    let (map, _dir) = populated_map();

    let rows: Vec<(String, String)> = map.iter().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(
        rows,
        [
            (s("k1"), s("v1")),
            (s("k2"), s("v2")),
            (s("k3"), s("v3")),
        ]
    );
}

#[test]
fn reverse_iteration_yields_the_reverse() {
    let (map, _dir) = populated_map();

    let keys: Vec<String> = map
        .iter_rev()
        .unwrap()
        .map(|row| row.map(|(key, _)| key))
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(keys, ["k3", "k2", "k1"]);
}

#[test]
fn key_and_value_projections() {
    let (map, _dir) = populated_map();

    let keys: Vec<String> = map.keys().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(keys, ["k1", "k2", "k3"]);

    let values: Vec<String> = map.values().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(values, ["v1", "v2", "v3"]);

    let keys_rev: Vec<String> = map.keys_rev().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(keys_rev, ["k3", "k2", "k1"]);

    let values_rev: Vec<String> = map.values_rev().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(values_rev, ["v3", "v2", "v1"]);
}

#[test]
fn iteration_sees_uncommitted_writes_on_the_same_connection() {
    let (map, _dir) = populated_map();
    // Auto-commit is off and nothing was committed; the scan still sees
    // this connection's own open transaction.
    assert_eq!(map.iter().unwrap().count(), 3);
}

#[test]
fn incrementing_the_last_position_reaches_the_sentinel() {
    let (map, _dir) = populated_map();

    let mut cursor = map.iter().unwrap();
    cursor.advance().unwrap();
    cursor.advance().unwrap();
    assert_eq!(cursor.get().unwrap().0, "k3");

    cursor.advance().unwrap();
    assert!(cursor.is_end());
    assert_eq!(cursor, Iter::end());

    // One more increment is iterator misuse.
    assert!(matches!(
        cursor.advance(),
        Err(TableMapError::OutOfRange(_))
    ));
}

#[test]
fn live_iterators_never_equal_the_sentinel() {
    let (map, _dir) = populated_map();

    let cursor = map.iter().unwrap();
    assert_ne!(cursor, Iter::end());
}

#[test]
fn forward_offsets_are_bounded() {
    let (map, _dir) = populated_map();

    let cursor = map.iter().unwrap().forward(2).unwrap();
    assert_eq!(cursor.get().unwrap().0, "k3");

    assert!(matches!(
        map.iter().unwrap().forward(4),
        Err(TableMapError::OutOfRange(_))
    ));
}

#[test]
fn separate_traversal_starts_are_not_positionally_comparable() {
    let (map, _dir) = populated_map();

    let first = map.iter().unwrap();
    let second = map.iter().unwrap();
    // Same data, same position, still unequal by design.
    assert_ne!(first, second);

    // Their end states are comparable.
    let first = first.forward(3).unwrap();
    let second = second.forward(3).unwrap();
    assert_eq!(first, second);
}

#[test]
fn clones_share_position_until_advanced() {
    let (map, _dir) = populated_map();

    let cursor = map.iter().unwrap();
    let twin = cursor.clone();
    assert_eq!(cursor, twin);

    let twin = twin.forward(1).unwrap();
    assert_ne!(cursor, twin);
    assert_eq!(twin.get().unwrap().0, "k2");
    // The original still dereferences to the first row.
    assert_eq!(cursor.get().unwrap().0, "k1");
}

#[test]
fn find_produces_a_single_row_iterator() {
    let (map, _dir) = populated_map();

    let mut found = map.find(&s("k2")).unwrap();
    assert_eq!(found.get().unwrap(), (s("k2"), s("v2")));

    found.advance().unwrap();
    assert!(found.is_end());

    let missing = map.find(&s("nope")).unwrap();
    assert!(missing.is_end());
}

#[test]
fn equal_range_brackets_a_single_match() {
    let (map, _dir) = populated_map();

    let (lower, upper) = map.equal_range(&s("k2")).unwrap();
    assert_eq!(lower, upper);
    assert_eq!(lower.get().unwrap().1, "v2");

    let (lower, upper) = map.equal_range(&s("nope")).unwrap();
    assert!(lower.is_end());
    assert!(upper.is_end());
}

#[test]
fn empty_map_iterates_straight_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default()
        .with_filename(dir.path().join("empty.db").to_string_lossy().into_owned());
    let map = TableMap::open(config).unwrap();

    let cursor = map.iter().unwrap();
    assert!(cursor.is_end());
    assert_eq!(map.keys().unwrap().count(), 0);
}

#[test]
fn streaming_pull_matches_indexed_access() {
    let (map, _dir) = populated_map();

    let mut cursor = map.keys().unwrap();
    assert_eq!(cursor.try_next().unwrap().as_deref(), Some("k1"));
    assert_eq!(cursor.try_next().unwrap().as_deref(), Some("k2"));
    assert_eq!(cursor.try_next().unwrap().as_deref(), Some("k3"));
    assert_eq!(cursor.try_next().unwrap(), None);
    assert_eq!(cursor.try_next().unwrap(), None);
}
