//! Integration tests for flutter-sweep
//!
//! These tests drive the library end to end: folders persisted to a
//! preferences file, restored by a fresh store, and cleaned by a session.

use flutter_sweep::bookmarks::PathBookmarks;
use flutter_sweep::cleanup::{self, OutcomeStatus, PermanentRemover, Remover};
use flutter_sweep::folders::{FolderStore, BOOKMARKS_KEY};
use flutter_sweep::preferences::{JsonPreferences, PreferenceStore};
use flutter_sweep::session::Session;
use flutter_sweep::utils;
use flutter_sweep::access::AccessProbe;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn open_store(preferences: &Path) -> FolderStore {
    let mut store = FolderStore::new(
        Box::new(PathBookmarks::new()),
        Box::new(JsonPreferences::open(preferences)),
    );
    store.load_persisted_if_needed();
    store
}

/// A Flutter-shaped project with a build dir and an iOS Pods dir.
fn create_project(root: &Path, name: &str) -> PathBuf {
    let project = root.join(name);
    fs::create_dir_all(project.join("build/app/outputs")).unwrap();
    fs::write(project.join("build/app/outputs/app.apk"), vec![7u8; 20_000]).unwrap();
    fs::create_dir_all(project.join(".dart_tool")).unwrap();
    fs::write(project.join(".dart_tool/package_config.json"), "{}").unwrap();
    fs::write(project.join("pubspec.lock"), "packages: {}\n").unwrap();
    fs::create_dir_all(project.join("ios/Pods/Flutter")).unwrap();
    fs::write(project.join("ios/Pods/Flutter/Flutter.h"), "// header").unwrap();
    fs::write(project.join("pubspec.yaml"), "name: app\n").unwrap();
    fs::create_dir_all(project.join("lib")).unwrap();
    fs::write(project.join("lib/main.dart"), "void main() {}\n").unwrap();
    project
}

fn session_for(store: FolderStore, remover: Arc<dyn Remover>) -> Session {
    Session::new(store, cleanup::cleanup_targets(&[]), remover, AccessProbe::default())
}

#[test]
fn test_persisted_folders_survive_restart() {
    let temp_dir = create_test_dir();
    let prefs = temp_dir.path().join("state/preferences.json");
    let zeta = create_project(temp_dir.path(), "Zeta");
    let alpha = create_project(temp_dir.path(), "alpha");

    {
        let mut store = open_store(&prefs);
        assert_eq!(store.add_folders([&zeta, &alpha]), 2);
        let alpha_id = store.folders()[0].id;
        store.toggle_activation(alpha_id);
    }

    let restored = open_store(&prefs);
    let paths: Vec<&str> = restored.folders().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![alpha.to_str().unwrap(), zeta.to_str().unwrap()]
    );
    // Activation is not persisted
    assert!(restored.folders().iter().all(|f| f.activated));

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&prefs).unwrap()).unwrap();
    assert_eq!(raw[BOOKMARKS_KEY].as_array().unwrap().len(), 2);
}

#[test]
fn test_folder_deleted_between_runs_is_dropped() {
    let temp_dir = create_test_dir();
    let prefs = temp_dir.path().join("preferences.json");
    let keep = create_project(temp_dir.path(), "keep");
    let gone = create_project(temp_dir.path(), "gone");

    open_store(&prefs).add_folders([&keep, &gone]);
    fs::remove_dir_all(&gone).unwrap();

    let restored = open_store(&prefs);
    assert_eq!(restored.len(), 1);
    assert_eq!(restored.folders()[0].path, keep.to_string_lossy());
}

#[test]
fn test_remove_rewrites_persisted_list() {
    let temp_dir = create_test_dir();
    let prefs = temp_dir.path().join("preferences.json");
    let a = create_project(temp_dir.path(), "a");
    let b = create_project(temp_dir.path(), "b");

    let mut store = open_store(&prefs);
    store.add_folders([&a, &b]);
    let a_id = store.folders()[0].id;
    assert!(store.remove_folder(a_id));

    let reopened = JsonPreferences::open(&prefs);
    assert_eq!(reopened.tokens(BOOKMARKS_KEY).unwrap().len(), 1);
    assert_eq!(open_store(&prefs).folders()[0].path, b.to_string_lossy());
}

#[test]
fn test_session_cleans_every_active_project() {
    let temp_dir = create_test_dir();
    let prefs = temp_dir.path().join("preferences.json");
    let shop = create_project(temp_dir.path(), "shop");
    let blog = create_project(temp_dir.path(), "blog");

    let expected_build = utils::calculate_allocated_size(&shop.join("build"))
        + utils::calculate_allocated_size(&blog.join("build"));

    let mut store = open_store(&prefs);
    store.add_folders([&shop, &blog]);
    let mut session = session_for(store, Arc::new(PermanentRemover));

    session.start_cleanup().unwrap();
    session.wait_for_cleanup(|_, _| {});

    let result = session.state().last_result.clone().unwrap();
    // build, .dart_tool, pubspec.lock and ios/Pods in each project
    assert_eq!(result.deleted_count, 8);
    assert_eq!(result.failed_count, 0);
    assert!(result.total_bytes_freed >= expected_build);

    for project in [&shop, &blog] {
        assert!(!project.join("build").exists());
        assert!(!project.join(".dart_tool").exists());
        assert!(!project.join("pubspec.lock").exists());
        assert!(!project.join("ios/Pods").exists());
        assert!(project.join("ios").exists());
        assert!(project.join("lib/main.dart").exists());
        assert!(project.join("pubspec.yaml").exists());
    }

    let message = session.state().success_message.clone().unwrap();
    assert!(message.starts_with("Cleanup complete!"));
    assert!(message.contains("8 item(s) deleted"));
}

#[test]
fn test_second_cleanup_finds_nothing() {
    let temp_dir = create_test_dir();
    let prefs = temp_dir.path().join("preferences.json");
    let app = create_project(temp_dir.path(), "app");

    let mut store = open_store(&prefs);
    store.add_folders([&app]);
    let mut session = session_for(store, Arc::new(PermanentRemover));

    session.start_cleanup().unwrap();
    session.wait_for_cleanup(|_, _| {});
    session.acknowledge_message();

    session.start_cleanup().unwrap();
    session.wait_for_cleanup(|_, _| {});

    assert_eq!(
        session.state().success_message.as_deref(),
        Some("No build artifacts were found in the selected projects.")
    );
    assert_eq!(session.state().last_result.as_ref().unwrap().deleted_count, 0);
}

/// Refuses every removal, like a folder the process cannot write to.
struct ReadOnlyRemover;

impl Remover for ReadOnlyRemover {
    fn remove(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"))
    }
}

#[test]
fn test_all_failures_produce_error_message() {
    let temp_dir = create_test_dir();
    let app = create_project(temp_dir.path(), "app");

    let result = cleanup::run_cleanup(&[app.clone()], &cleanup::cleanup_targets(&[]), &ReadOnlyRemover)
        .unwrap();

    assert_eq!(result.deleted_count, 0);
    assert_eq!(result.failed_count, 4);
    assert!(result
        .outcomes
        .iter()
        .all(|o| matches!(o.status, OutcomeStatus::Failed { .. })));
    assert!(app.join("build").exists());

    let mut store = FolderStore::new(
        Box::new(PathBookmarks::new()),
        Box::new(flutter_sweep::preferences::MemoryPreferences::new()),
    );
    store.add_folders([&app]);
    let mut session = session_for(store, Arc::new(ReadOnlyRemover));
    session.start_cleanup().unwrap();
    session.wait_for_cleanup(|_, _| {});
    assert_eq!(
        session.state().error_message.as_deref(),
        Some("Nothing was deleted. 4 error(s) found.")
    );
}

#[test]
fn test_extra_targets_from_config() {
    let temp_dir = create_test_dir();
    let app = create_project(temp_dir.path(), "app");
    fs::create_dir_all(app.join("android/.gradle")).unwrap();

    let targets = cleanup::cleanup_targets(&["android/.gradle".to_string(), "../escape".to_string()]);
    assert!(targets.contains(&"android/.gradle".to_string()));
    assert!(!targets.iter().any(|t| t.contains("..")));

    let result = cleanup::run_cleanup(&[app.clone()], &targets, &PermanentRemover).unwrap();
    assert_eq!(result.deleted_count, 5);
    assert!(!app.join("android/.gradle").exists());
    assert!(app.join("android").exists());
}
