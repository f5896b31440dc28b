//! Tests for the registry-backed feature registration engine.

use shellmate::{
    FeatureRegistration, MemoryStore, Registration, RegistryStore, ShellError, WriteEntry,
};

const ROOT: &str = "Software\\Classes\\Applications\\app.exe";

/// The concrete shape from the file-handler feature: a command, a
/// friendly name, and an icon, with the command as marker.
fn app_feature(exe: &str) -> FeatureRegistration {
    FeatureRegistration::new(
        "file-handler",
        ROOT,
        vec![
            WriteEntry::new(Some("shell\\open\\command"), "", format!("\"{exe}\" \"%1\"")),
            WriteEntry::new(Some("shell\\open"), "FriendlyAppName", "App"),
            WriteEntry::new(Some("DefaultIcon"), "", "\"C:\\App\\file.ico\""),
        ],
    )
}

#[test]
#[should_panic(expected = "marker entry")]
fn empty_part_list_is_rejected_at_construction() {
    FeatureRegistration::new("broken", "Software\\Classes\\X", vec![]);
}

#[test]
fn fresh_feature_is_not_registered() {
    let store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");

    assert_eq!(feature.registration(&store), Registration::NotRegistered);
    assert!(!feature.is_registered(&store));
}

#[test]
fn register_writes_every_entry() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");

    feature.register(&mut store).unwrap();

    assert!(feature.is_registered(&store));
    assert_eq!(
        store
            .get(&format!("{ROOT}\\shell\\open\\command"), "")
            .unwrap()
            .as_deref(),
        Some("\"C:\\App\\app.exe\" \"%1\"")
    );
    assert_eq!(
        store
            .get(&format!("{ROOT}\\shell\\open"), "FriendlyAppName")
            .unwrap()
            .as_deref(),
        Some("App")
    );
    assert_eq!(
        store
            .get(&format!("{ROOT}\\DefaultIcon"), "")
            .unwrap()
            .as_deref(),
        Some("\"C:\\App\\file.ico\"")
    );
}

#[test]
fn register_twice_is_idempotent() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");

    feature.register(&mut store).unwrap();
    let after_once = store.clone();
    feature.register(&mut store).unwrap();

    assert_eq!(store, after_once);
}

#[test]
fn registration_checks_only_the_marker() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");
    feature.register(&mut store).unwrap();

    // Corrupting a non-marker entry goes unnoticed
    store
        .set(&format!("{ROOT}\\shell\\open"), "FriendlyAppName", "Other")
        .unwrap();
    assert!(feature.is_registered(&store));

    // Corrupting the marker flips the answer
    store
        .set(&format!("{ROOT}\\shell\\open\\command"), "", "something else")
        .unwrap();
    assert_eq!(feature.registration(&store), Registration::NotRegistered);
}

#[test]
fn marker_read_failure_is_indeterminate() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");
    feature.register(&mut store).unwrap();

    store.fail_reads(true);
    assert_eq!(feature.registration(&store), Registration::Indeterminate);
    assert!(!feature.is_registered(&store));
}

#[test]
fn register_attempts_all_entries_and_aggregates_failures() {
    let mut store = MemoryStore::new();
    store.fail_key(format!("{ROOT}\\shell\\open"));
    let feature = app_feature("C:\\App\\app.exe");

    let err = feature.register(&mut store).unwrap_err();
    match err {
        ShellError::PartialWrite {
            feature,
            total,
            failures,
        } => {
            assert_eq!(feature, "file-handler");
            assert_eq!(total, 3);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, format!("{ROOT}\\shell\\open"));
        }
        other => panic!("expected PartialWrite, got {other:?}"),
    }

    // The entries around the failing one were still written
    assert!(store.key_exists(&format!("{ROOT}\\shell\\open\\command")));
    assert!(store.key_exists(&format!("{ROOT}\\DefaultIcon")));
}

#[test]
fn register_against_an_unwritable_store_reports_every_entry() {
    let mut store = MemoryStore::new();
    store.fail_writes(true);
    let feature = app_feature("C:\\App\\app.exe");

    let err = feature.register(&mut store).unwrap_err();
    match err {
        ShellError::PartialWrite { total, failures, .. } => {
            assert_eq!(total, 3);
            assert_eq!(failures.len(), 3);
        }
        other => panic!("expected PartialWrite, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn deregister_unregistered_is_a_reported_noop() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");
    let before = store.clone();

    assert!(!feature.deregister(&mut store).unwrap());
    assert_eq!(store, before);
}

#[test]
fn deregister_removes_the_whole_subtree() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");
    feature.register(&mut store).unwrap();
    assert_eq!(store.subtree_len(ROOT), 3);

    assert!(feature.deregister(&mut store).unwrap());

    assert_eq!(store.subtree_len(ROOT), 0);
    assert!(store.is_empty());
    assert!(!feature.is_registered(&store));
}

#[test]
fn deregister_on_indeterminate_state_deletes_nothing() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");
    feature.register(&mut store).unwrap();

    store.fail_reads(true);
    assert!(!feature.deregister(&mut store).unwrap());

    store.fail_reads(false);
    assert!(feature.is_registered(&store));
}

#[test]
fn update_refuses_to_create_an_unregistered_feature() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");

    let err = feature.update(&mut store).unwrap_err();
    assert!(matches!(err, ShellError::NotRegistered { .. }));
    assert!(store.is_empty());
}

#[test]
fn update_propagates_marker_read_errors() {
    let mut store = MemoryStore::new();
    let feature = app_feature("C:\\App\\app.exe");
    feature.register(&mut store).unwrap();

    store.fail_reads(true);
    let err = feature.update(&mut store).unwrap_err();
    assert!(matches!(err, ShellError::StoreRead { .. }));
}

#[test]
fn update_rewrites_entries_after_configuration_change() {
    let mut store = MemoryStore::new();
    app_feature("C:\\App\\app.exe").register(&mut store).unwrap();

    // The executable moved; same feature, new values
    let moved = app_feature("D:\\Apps\\app.exe");
    assert_eq!(moved.registration(&store), Registration::NotRegistered);

    moved.update(&mut store).unwrap();

    assert!(moved.is_registered(&store));
    assert_eq!(
        store
            .get(&format!("{ROOT}\\shell\\open\\command"), "")
            .unwrap()
            .as_deref(),
        Some("\"D:\\Apps\\app.exe\" \"%1\"")
    );
}

#[test]
fn features_with_root_level_entries_register_and_deregister() {
    // The context-menu shape: two of three entries sit at the root key
    let root = "Software\\Classes\\*\\shell\\App";
    let feature = FeatureRegistration::new(
        "file-menu",
        root,
        vec![
            WriteEntry::new(Some("command"), "", "\"C:\\App\\app.exe\" \"%1\""),
            WriteEntry::new(None, "", "Open with App"),
            WriteEntry::new(None, "Icon", "\"C:\\App\\app.exe\""),
        ],
    );

    let mut store = MemoryStore::new();
    feature.register(&mut store).unwrap();

    assert_eq!(store.get(root, "").unwrap().as_deref(), Some("Open with App"));
    assert_eq!(
        store.get(root, "Icon").unwrap().as_deref(),
        Some("\"C:\\App\\app.exe\"")
    );
    assert!(feature.is_registered(&store));

    assert!(feature.deregister(&mut store).unwrap());
    assert!(store.is_empty());
}
