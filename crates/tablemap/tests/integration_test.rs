//! Integration tests for the map facade.

use tablemap::prelude::*;
use tempfile::TempDir;

fn s(v: &str) -> String {
    v.to_string()
}

/// Helper to create a file-backed string map in a fresh temp directory.
fn create_test_map() -> (TableMap<String, String>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default()
        .with_filename(dir.path().join("test.db").to_string_lossy().into_owned());
    let map = TableMap::open(config).unwrap();
    (map, dir)
}

#[test]
fn set_get_erase_scenario() {
    let (map, _dir) = create_test_map();

    assert!(map.is_empty().unwrap());
    map.set(&s("a"), &s("1")).unwrap();
    map.set(&s("b"), &s("2")).unwrap();
    assert_eq!(map.len().unwrap(), 2);
    assert_eq!(map.get(&s("a")).unwrap(), "1");
    assert_eq!(map.erase(&s("a")).unwrap(), 1);
    assert_eq!(map.len().unwrap(), 1);
    assert!(!map.contains(&s("a")).unwrap());
}

#[test]
fn upsert_is_idempotent() {
    let (map, _dir) = create_test_map();

    map.set(&s("k"), &s("v")).unwrap();
    map.set(&s("k"), &s("v")).unwrap();
    assert_eq!(map.len().unwrap(), 1);
    assert_eq!(map.get(&s("k")).unwrap(), "v");
}

#[test]
fn insert_never_overwrites() {
    let (map, _dir) = create_test_map();

    let (_, inserted) = map.insert(s("k"), s("first")).unwrap();
    assert!(inserted);

    let (position, inserted) = map.insert(s("k"), s("second")).unwrap();
    assert!(!inserted);
    assert_eq!(position.get().unwrap().1, "first");
    assert_eq!(map.get(&s("k")).unwrap(), "first");
}

#[test]
fn get_raises_and_try_get_does_not() {
    let (map, _dir) = create_test_map();

    assert!(matches!(
        map.get(&s("missing")),
        Err(TableMapError::NotFound(_))
    ));
    assert_eq!(map.try_get(&s("missing")).unwrap(), None);
    assert_eq!(map.count(&s("missing")).unwrap(), 0);
    assert!(!map.contains(&s("missing")).unwrap());
}

#[test]
fn entry_auto_creates_the_default_value() {
    let (map, _dir) = create_test_map();

    let proxy = map.entry(&s("fresh")).unwrap();
    assert_eq!(*proxy, "");
    assert_eq!(map.get(&s("fresh")).unwrap(), "");

    let mut proxy = map.entry(&s("fresh")).unwrap();
    proxy.assign(s("assigned")).unwrap();
    assert_eq!(*proxy, "assigned");
    assert_eq!(map.get(&s("fresh")).unwrap(), "assigned");
}

#[test]
fn at_requires_an_existing_key() {
    let (map, _dir) = create_test_map();

    assert!(map.at(&s("missing")).is_err());

    map.set(&s("k"), &s("v")).unwrap();
    let proxy = map.at(&s("k")).unwrap();
    assert_eq!(proxy.key(), "k");
    assert!(proxy == s("v"));
}

#[test]
fn extract_then_reinsert_under_new_key() {
    let (map, _dir) = create_test_map();

    map.set(&s("old"), &s("v")).unwrap();
    map.set(&s("other"), &s("w")).unwrap();

    let mut node = map.extract(&s("old")).unwrap();
    assert!(!node.is_empty());
    assert_eq!(map.len().unwrap(), 1);

    *node.key_mut().unwrap() = s("new");
    let outcome = map.insert_node(node).unwrap();
    assert!(outcome.inserted);
    assert!(outcome.node.is_empty());
    assert_eq!(map.len().unwrap(), 2);
    assert_eq!(map.get(&s("new")).unwrap(), "v");
}

#[test]
fn reinserting_a_colliding_node_returns_it() {
    let (map, _dir) = create_test_map();

    map.set(&s("a"), &s("1")).unwrap();
    map.set(&s("b"), &s("2")).unwrap();

    let mut node = map.extract(&s("a")).unwrap();
    *node.key_mut().unwrap() = s("b");
    let outcome = map.insert_node(node).unwrap();

    assert!(!outcome.inserted);
    assert_eq!(outcome.node.key().map(String::as_str), Some("b"));
    assert_eq!(outcome.node.value().map(String::as_str), Some("1"));
    // Position points at the pre-existing entry; nothing was overwritten.
    assert_eq!(outcome.position.get().unwrap().1, "2");
    assert_eq!(map.len().unwrap(), 1);
    assert_eq!(map.get(&s("b")).unwrap(), "2");
}

#[test]
fn extracting_a_missing_key_yields_an_empty_node() {
    let (map, _dir) = create_test_map();

    let node = map.extract(&s("missing")).unwrap();
    assert!(node.is_empty());

    // Inserting an empty node is a no-op.
    let outcome = map.insert_node(node).unwrap();
    assert!(!outcome.inserted);
    assert!(outcome.position.is_end());
    assert_eq!(map.len().unwrap(), 0);
}

#[test]
fn extract_at_iterator_position() {
    let (map, _dir) = create_test_map();

    map.set(&s("a"), &s("1")).unwrap();
    let position = map.find(&s("a")).unwrap();
    let node = map.extract_at(&position).unwrap();
    assert_eq!(node.key().map(String::as_str), Some("a"));
    assert!(map.is_empty().unwrap());

    let node = map.extract_at(&Iter::end()).unwrap();
    assert!(node.is_empty());
}

#[test]
fn erase_if_removes_matching_rows() {
    let (map, _dir) = create_test_map();

    map.set(&s("keep1"), &s("1")).unwrap();
    map.set(&s("drop1"), &s("2")).unwrap();
    map.set(&s("keep2"), &s("3")).unwrap();
    map.set(&s("drop2"), &s("4")).unwrap();

    let erased = map.erase_if(|(key, _)| key.starts_with("drop")).unwrap();
    assert_eq!(erased, 2);
    assert_eq!(map.len().unwrap(), 2);
    assert!(map.contains(&s("keep1")).unwrap());
    assert!(map.contains(&s("keep2")).unwrap());
}

#[test]
fn insert_many_skips_existing_keys() {
    let (map, _dir) = create_test_map();

    map.set(&s("b"), &s("kept")).unwrap();
    map.insert_many([(s("a"), s("1")), (s("b"), s("clobbered")), (s("c"), s("3"))])
        .unwrap();

    assert_eq!(map.len().unwrap(), 3);
    assert_eq!(map.get(&s("b")).unwrap(), "kept");
    assert_eq!(map.get(&s("a")).unwrap(), "1");
}

#[test]
fn insert_or_assign_always_wins() {
    let (map, _dir) = create_test_map();

    let (_, inserted) = map.insert_or_assign(s("k"), s("1")).unwrap();
    assert!(inserted);
    let (_, inserted) = map.insert_or_assign(s("k"), s("2")).unwrap();
    assert!(!inserted);
    assert_eq!(map.get(&s("k")).unwrap(), "2");
}

#[test]
fn try_insert_and_hinted_variants_never_overwrite() {
    let (map, _dir) = create_test_map();

    let (_, inserted) = map.try_insert(s("k"), s("1")).unwrap();
    assert!(inserted);
    let (_, inserted) = map.try_insert(s("k"), s("2")).unwrap();
    assert!(!inserted);

    let hint = map.find(&s("k")).unwrap();
    let position = map.insert_hint(&hint, s("k"), s("3")).unwrap();
    assert_eq!(position.get().unwrap().1, "1");
    let position = map.try_insert_hint(&hint, s("k"), s("4")).unwrap();
    assert_eq!(position.get().unwrap().1, "1");

    assert_eq!(map.get(&s("k")).unwrap(), "1");
}

#[test]
fn clear_empties_the_table() {
    let (map, _dir) = create_test_map();

    map.set(&s("a"), &s("1")).unwrap();
    map.set(&s("b"), &s("2")).unwrap();
    map.clear().unwrap();
    assert!(map.is_empty().unwrap());
}

#[test]
fn sql_substitutes_the_table_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default()
        .with_filename(dir.path().join("test.db").to_string_lossy().into_owned())
        .with_table("select");
    let map = TableMap::open(config).unwrap();

    assert_eq!(
        map.sql("SELECT * FROM :table"),
        "SELECT * FROM \"select\""
    );
    // Reserved words are handled by quoting.
    map.set(&s("k"), &s("v")).unwrap();
    assert_eq!(map.get(&s("k")).unwrap(), "v");
}

#[test]
fn placeholder_named_table_is_quoted_not_recursed() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default()
        .with_filename(dir.path().join("test.db").to_string_lossy().into_owned())
        .with_table(":table");
    let map = TableMap::open(config).unwrap();

    assert_eq!(map.sql("SELECT * FROM :table"), "SELECT * FROM \":table\"");
    map.set(&s("k"), &s("v")).unwrap();
    assert_eq!(map.get(&s("k")).unwrap(), "v");
}

#[test]
fn table_names_lists_tables_without_a_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("multi.db");
    let filename = path.to_string_lossy().into_owned();

    {
        let map =
            TableMap::open(Config::default().with_filename(filename.as_str()).with_table("alpha")).unwrap();
        map.set(&s("k"), &s("v")).unwrap();
        map.commit().unwrap();
    }
    {
        TableMap::open(Config::default().with_filename(filename.as_str()).with_table("beta")).unwrap();
    }

    let mut names = table_names(&path).unwrap();
    names.sort();
    assert_eq!(names, ["alpha", "beta"]);
}

#[test]
fn table_names_fails_for_a_missing_file() {
    assert!(matches!(
        table_names("/nonexistent/definitely-not-here.db"),
        Err(TableMapError::FileMissing(_))
    ));
}

#[test]
fn empty_filename_uses_an_ephemeral_temp_file() {
    let mut map = TableMap::open(Config::default()).unwrap();
    assert!(map.in_temp());
    let path = map.filename().to_path_buf();
    assert!(path.exists());

    map.set(&s("k"), &s("v")).unwrap();
    map.close().unwrap();
    assert!(!path.exists());

    // Closing twice is fine.
    map.close().unwrap();
}

#[test]
fn memory_map_touches_no_file() {
    let map = TableMap::open(Config::default().with_filename(":memory:")).unwrap();
    assert!(map.in_memory());
    assert!(!map.in_temp());
    map.set(&s("k"), &s("v")).unwrap();
    assert_eq!(map.get(&s("k")).unwrap(), "v");
}

#[test]
fn terminate_deletes_the_backing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doomed.db");
    let mut map = TableMap::open(
        Config::default().with_filename(path.to_string_lossy().into_owned()),
    )
    .unwrap();
    map.set(&s("k"), &s("v")).unwrap();
    assert!(path.exists());

    map.terminate().unwrap();
    assert!(!path.exists());
}

#[test]
fn display_names_the_backing_file() {
    let (map, _dir) = create_test_map();
    let rendered = map.to_string();
    assert!(rendered.starts_with("tablemap("));
    assert!(rendered.contains("test.db"));
}

#[test]
fn custom_codecs_fix_the_four_types() {
    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    let codecs: CodecPair<u64, Point, i64, String> = CodecPair::new(
        KeyCodec::new(|k: &u64| *k as i64, |s: &i64| *s as u64),
        ValueCodec::new(
            |p: &Point| format!("{}:{}", p.x, p.y),
            |s: &String| {
                let (x, y) = s.split_once(':').unwrap_or(("0", "0"));
                Point {
                    x: x.parse().unwrap_or(0),
                    y: y.parse().unwrap_or(0),
                }
            },
        ),
    );

    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(codecs)
        .with_filename(dir.path().join("points.db").to_string_lossy().into_owned())
        .with_table("points");
    let map = TableMap::open(config).unwrap();

    let point = Point { x: -3, y: 14 };
    map.set(&7, &point).unwrap();
    assert_eq!(map.get(&7).unwrap(), point);

    let rows: Vec<(u64, Point)> = map.iter().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(rows, [(7, point)]);
}

#[test]
fn mismatched_codec_reads_degrade_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let filename = dir.path().join("loose.db").to_string_lossy().into_owned();

    {
        let map = TableMap::open(
            Config::default().with_filename(filename.as_str()).with_table("t"),
        )
        .unwrap();
        map.set(&s("numeric"), &s("42")).unwrap();
        map.set(&s("textual"), &s("not a number")).unwrap();
        map.commit().unwrap();
    }

    // Reopening the TEXT column with an integer value codec coerces
    // instead of erroring.
    let map = TableMap::open(
        Config::<String, i64>::identity()
            .with_filename(filename.as_str())
            .with_table("t"),
    )
    .unwrap();
    assert_eq!(map.get(&s("numeric")).unwrap(), 42);
    assert_eq!(map.get(&s("textual")).unwrap(), 0);
}
