//! Behaviour every `Store` backend must share.

use rummage::storage::{JsonStore, SqliteStore, Store, StoreOptions};
use rummage::{Entry, RummageError};
use tempfile::TempDir;

type Factory = fn(&TempDir, StoreOptions) -> Box<dyn Store>;

fn sqlite(dir: &TempDir, options: StoreOptions) -> Box<dyn Store> {
    let store = SqliteStore::open(&dir.path().join("rummage.db")).unwrap();
    Box::new(store.with_options(options))
}

fn sqlite_memory(_dir: &TempDir, options: StoreOptions) -> Box<dyn Store> {
    Box::new(SqliteStore::open_in_memory().unwrap().with_options(options))
}

fn json(dir: &TempDir, options: StoreOptions) -> Box<dyn Store> {
    let store = JsonStore::open(dir.path().join("rummage.json")).unwrap();
    Box::new(store.with_options(options))
}

const BACKENDS: [(&str, Factory); 3] = [
    ("sqlite", sqlite),
    ("sqlite-memory", sqlite_memory),
    ("json", json),
];

fn for_each_backend(test: impl Fn(&str, &mut dyn Store)) {
    for (name, factory) in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let mut store = factory(&dir, StoreOptions::default());
        test(name, store.as_mut());
    }
}

fn owned(paths: &[&str]) -> Vec<String> {
    paths.iter().map(ToString::to_string).collect()
}

fn stored_paths(store: &dyn Store) -> Vec<String> {
    store.list().unwrap().into_iter().map(|e| e.path).collect()
}

#[test]
fn add_is_idempotent() {
    for_each_backend(|name, store| {
        let first = store.add("github.com/gorilla/mux").unwrap();
        let second = store.add("github.com/gorilla/mux").unwrap();
        assert_eq!(first, second, "{name}");

        store.update("github.com/gorilla/mux", 7.0, 100).unwrap();
        let third = store.add("github.com/gorilla/mux").unwrap();
        assert_eq!(third.score, 7.0, "{name}");
        assert_eq!(third.last_accessed, 100, "{name}");
        assert_eq!(store.list().unwrap().len(), 1, "{name}");
    });
}

#[test]
fn add_validates_package_shape() {
    for_each_backend(|name, store| {
        let err = store.add("not-a-package").unwrap_err();
        assert!(matches!(err, RummageError::Validation(ref p) if p == "not-a-package"), "{name}");
        assert!(store.list().unwrap().is_empty(), "{name}");

        let entry = store.add("github.com/gorilla/mux").unwrap();
        assert_eq!(entry.score, 1.0, "{name}");
        assert!(entry.last_accessed > 0, "{name}");
    });
}

#[test]
fn add_multi_stops_at_first_invalid_path() {
    for_each_backend(|name, store| {
        let err = store
            .add_multi(&owned(&["a.com/x/y", "a.com/x/z", "bad", "a.com/x/w"]))
            .unwrap_err();

        assert_eq!(err.count_added(), 2, "{name}");
        assert_eq!(err.index, 2, "{name}");
        assert!(matches!(err.source, RummageError::Validation(ref p) if p == "bad"), "{name}");
        assert!(err.to_string().contains("bad"), "{name}");
        assert_eq!(stored_paths(store), ["a.com/x/y", "a.com/x/z"], "{name}");
    });
}

#[test]
fn add_multi_skips_existing_paths() {
    for_each_backend(|name, store| {
        store.add("a.com/x/y").unwrap();

        let added = store
            .add_multi(&owned(&["a.com/x/y", "a.com/x/z", "a.com/x/z"]))
            .unwrap();
        let added: Vec<_> = added.into_iter().map(|e| e.path).collect();
        assert_eq!(added, ["a.com/x/z"], "{name}");
        assert_eq!(stored_paths(store), ["a.com/x/y", "a.com/x/z"], "{name}");
    });
}

#[test]
fn get_and_update() {
    for_each_backend(|name, store| {
        assert!(matches!(store.get("a.com/x/y"), Err(RummageError::NotFound(_))), "{name}");
        assert!(
            matches!(store.update("a.com/x/y", 2.0, 5), Err(RummageError::NotFound(_))),
            "{name}"
        );

        store.add("a.com/x/y").unwrap();
        let updated = store.update("a.com/x/y", 2.5, 5).unwrap();
        assert_eq!(
            updated,
            Entry {
                path: "a.com/x/y".to_string(),
                score: 2.5,
                last_accessed: 5,
            },
            "{name}"
        );
        assert_eq!(store.get("a.com/x/y").unwrap(), updated, "{name}");
    });
}

#[test]
fn delete_returns_removed_value() {
    for_each_backend(|name, store| {
        store.add("a.com/x/y").unwrap();
        store.add("a.com/x/z").unwrap();
        store.update("a.com/x/y", 3.0, 9).unwrap();

        let removed = store.delete("a.com/x/y").unwrap();
        assert_eq!(removed.score, 3.0, "{name}");
        assert_eq!(removed.last_accessed, 9, "{name}");
        assert_eq!(stored_paths(store), ["a.com/x/z"], "{name}");

        let err = store.delete("a.com/x/y").unwrap_err();
        assert!(matches!(err, RummageError::NotFound(_)), "{name}");
        assert_eq!(stored_paths(store), ["a.com/x/z"], "{name}");
    });
}

#[test]
fn delete_all_empties_store() {
    for_each_backend(|name, store| {
        store.add_multi(&owned(&["a.com/x/y", "a.com/x/z"])).unwrap();
        store.delete_all().unwrap();
        assert!(store.list().unwrap().is_empty(), "{name}");
        store.delete_all().unwrap();
    });
}

#[test]
fn highest_score_match_ranks_by_score() {
    for_each_backend(|name, store| {
        store.add_multi(&owned(&["a.com/x/mux", "a.com/y/mux", "a.com/z/chi"])).unwrap();
        store.update("a.com/y/mux", 5.0, 0).unwrap();
        store.update("a.com/z/chi", 50.0, 0).unwrap();

        assert_eq!(store.highest_score_match("mux").unwrap().path, "a.com/y/mux", "{name}");
    });
}

#[test]
fn highest_score_match_tie_keeps_first_inserted() {
    for_each_backend(|name, store| {
        store.add_multi(&owned(&["a.com/b/mux", "a.com/a/mux"])).unwrap();
        store.update("a.com/b/mux", 2.0, 0).unwrap();
        store.update("a.com/a/mux", 2.0, 0).unwrap();

        assert_eq!(store.highest_score_match("mux").unwrap().path, "a.com/b/mux", "{name}");
    });
}

#[test]
fn highest_score_match_without_match_is_error() {
    for_each_backend(|name, store| {
        assert!(matches!(store.highest_score_match("mux"), Err(RummageError::NoMatch(_))), "{name}");

        store.add_multi(&owned(&["a.com/x/mux", "a.com/x/chi"])).unwrap();
        let err = store.highest_score_match("zzz").unwrap_err();
        assert!(matches!(err, RummageError::NoMatch(ref q) if q == "zzz"), "{name}");
        assert!(err.to_string().contains("zzz"), "{name}");
    });
}

#[test]
fn singleton_shortcut_is_configurable() {
    for (name, factory) in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let mut store = factory(&dir, StoreOptions::default());
        store.add("a.com/x/mux").unwrap();
        assert_eq!(store.highest_score_match("zzz").unwrap().path, "a.com/x/mux", "{name}");

        let dir = tempfile::tempdir().unwrap();
        let mut strict = factory(&dir, StoreOptions { singleton_shortcut: false });
        strict.add("a.com/x/mux").unwrap();
        assert!(matches!(strict.highest_score_match("zzz"), Err(RummageError::NoMatch(_))), "{name}");
        assert_eq!(strict.highest_score_match("mux").unwrap().path, "a.com/x/mux", "{name}");
    }
}

#[test]
fn top_n_matches_sorts_and_truncates() {
    for_each_backend(|name, store| {
        store
            .add_multi(&owned(&["a.com/x/mux", "a.com/y/mux", "a.com/z/mux", "a.com/z/chi"]))
            .unwrap();
        store.update("a.com/y/mux", 5.0, 0).unwrap();
        store.update("a.com/z/mux", 3.0, 0).unwrap();

        let top: Vec<_> = store
            .top_n_matches("mux", 2)
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(top, ["a.com/y/mux", "a.com/z/mux"], "{name}");

        let all = store.top_n_matches("mux", 10).unwrap();
        assert_eq!(all.len(), 3, "{name}");
        assert!(store.top_n_matches("mux", 0).unwrap().is_empty(), "{name}");
    });
}

#[test]
fn top_n_matches_without_match_is_error() {
    for_each_backend(|name, store| {
        assert!(matches!(store.top_n_matches("zzz", 10), Err(RummageError::NoMatch(_))), "{name}");
        store.add("a.com/x/mux").unwrap();
        assert!(matches!(store.top_n_matches("zzz", 10), Err(RummageError::NoMatch(_))), "{name}");
    });
}

#[test]
fn exact_contains_match_uses_store_order() {
    for_each_backend(|name, store| {
        store.add_multi(&owned(&["a.com/x/mux", "a.com/y/mux"])).unwrap();
        store.update("a.com/y/mux", 99.0, 0).unwrap();

        assert_eq!(store.exact_contains_match("mux").unwrap().path, "a.com/x/mux", "{name}");
        assert_eq!(store.exact_contains_match("y/mu").unwrap().path, "a.com/y/mux", "{name}");
        assert!(matches!(store.exact_contains_match("chi"), Err(RummageError::NoMatch(_))), "{name}");
    });
}

#[test]
fn substring_matching_is_case_sensitive() {
    for_each_backend(|name, store| {
        store.add_multi(&owned(&["github.com/BurntSushi/toml", "a.com/x/y"])).unwrap();
        assert!(store.top_n_matches("burntsushi", 10).is_err(), "{name}");
        assert!(store.top_n_matches("BurntSushi", 10).is_ok(), "{name}");
    });
}
