use std::fs;
use std::path::{Path, PathBuf};

use indoc::indoc;
use pretty_assertions::assert_eq;
use sources::{InsertionPoint, SourceError, SourceSet};
use tempfile::TempDir;

fn seed(root: &Path, path: &str, contents: &str) {
    let target = root.join(path);
    fs::create_dir_all(target.parent().expect("parent")).expect("create parent dirs");
    fs::write(target, contents).expect("seed file");
}

#[test]
fn reads_regular_files_recursively() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "a/b/First.java", "first");
    seed(dir.path(), "Second.java", "second");

    let set = SourceSet::from_directory(dir.path()).expect("read set");
    assert_eq!(set.len(), 2);
    let paths: Vec<&Path> = set.paths().collect();
    assert_eq!(paths, [Path::new("Second.java"), Path::new("a/b/First.java")]);
}

#[test]
fn missing_root_reads_as_empty_set() {
    let dir = TempDir::new().expect("temp dir");
    let set = SourceSet::from_directory(dir.path().join("absent")).expect("read set");
    assert!(set.is_empty());
}

#[test]
fn looks_up_by_exact_path_and_unique_suffix() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "io/acme/One.java", "one");
    seed(dir.path(), "io/acme/Two.java", "two");

    let set = SourceSet::from_directory(dir.path()).expect("read set");
    assert!(set.file("io/acme/One.java").is_ok());
    let by_suffix = set.file("One.java").expect("suffix match");
    assert_eq!(by_suffix.path(), Path::new("io/acme/One.java"));
}

#[test]
fn ambiguous_suffix_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "a/Same.java", "a");
    seed(dir.path(), "b/Same.java", "b");

    let set = SourceSet::from_directory(dir.path()).expect("read set");
    match set.file("Same.java") {
        Err(SourceError::Ambiguous { matches, .. }) => assert_eq!(matches.len(), 2),
        other => panic!("expected ambiguity, got {:?}", other.map(|f| f.path().to_path_buf())),
    }
    match set.file("Missing.java") {
        Err(SourceError::NotFound(path)) => assert_eq!(path, PathBuf::from("Missing.java")),
        other => panic!("expected not-found, got {:?}", other.map(|f| f.path().to_path_buf())),
    }
}

#[test]
fn created_files_reach_the_disk_on_flush() {
    let dir = TempDir::new().expect("temp dir");
    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    set.create_file("acme/made/Fresh.java", "class Fresh {}");
    set.write().expect("flush");
    let written =
        fs::read_to_string(dir.path().join("acme/made/Fresh.java")).expect("created file");
    assert_eq!(written, "class Fresh {}");
}

#[test]
fn deleted_files_vanish_from_the_disk() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "DeleteMe.java", "foo bar");

    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    set.delete("DeleteMe.java").expect("delete");
    set.write().expect("flush");
    assert!(!dir.path().join("DeleteMe.java").exists());
}

#[test]
fn deleting_a_directory_path_removes_the_subtree() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "junk/Deep.java", "deep");
    seed(dir.path(), "Keep.java", "keep");

    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    set.delete("junk").expect("delete directory");
    set.write().expect("flush");
    assert!(!dir.path().join("junk").exists());
    assert!(dir.path().join("Keep.java").exists());
}

#[test]
fn delete_of_unknown_path_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    match set.delete("Ghost.java") {
        Err(SourceError::NotFound(path)) => assert_eq!(path, PathBuf::from("Ghost.java")),
        other => panic!("expected not-found, got {:?}", other),
    }
}

#[test]
fn a_file_created_and_deleted_in_one_run_never_lands_on_disk() {
    let dir = TempDir::new().expect("temp dir");
    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    set.create_file("Fleeting.java", "now you see me");
    set.delete("Fleeting.java").expect("delete created file");
    set.write().expect("flush");
    assert!(!dir.path().join("Fleeting.java").exists());
}

#[test]
fn unchanged_files_are_not_rewritten() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "Untouched.java", "as it was");
    // A rewrite would fail on a read-only file, so a clean flush proves
    // the file was left alone.
    let target = dir.path().join("Untouched.java");
    let mut permissions = fs::metadata(&target).expect("metadata").permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&target, permissions).expect("set read-only");

    let set = SourceSet::from_directory(dir.path()).expect("read set");
    set.write().expect("flush leaves unchanged files alone");
    assert_eq!(fs::read_to_string(&target).expect("content"), "as it was");
}

#[test]
fn overwrite_replaces_contents_on_disk() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "Rewritten.java", "old");

    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    set.file_mut("Rewritten.java").expect("lookup").overwrite("new");
    set.write().expect("flush");
    assert_eq!(
        fs::read_to_string(dir.path().join("Rewritten.java")).expect("content"),
        "new"
    );
}

#[test]
fn pre_read_actions_skip_files_nobody_reads() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "Read.java", "body");
    seed(dir.path(), "Unread.java", "body");

    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    set.prepare_code(|file| {
        let current = file.code().to_string();
        file.overwrite(format!("// INSERT:'file_start'\n{current}"));
    });
    // Reading one file fires the action for it alone.
    let read = set.file_mut("Read.java").expect("lookup").code().to_string();
    assert!(read.starts_with("// INSERT:'file_start'"));
    set.write().expect("flush");

    let read_disk = fs::read_to_string(dir.path().join("Read.java")).expect("content");
    let unread_disk = fs::read_to_string(dir.path().join("Unread.java")).expect("content");
    assert_eq!(read_disk, "// INSERT:'file_start'\nbody");
    assert_eq!(unread_disk, "body");
}

#[test]
fn files_created_after_prepare_code_inherit_the_action() {
    let dir = TempDir::new().expect("temp dir");
    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    set.prepare_code(|file| {
        let current = file.code().to_string();
        file.overwrite(format!("prelude\n{current}"));
    });
    set.create_file("Late.java", "late body");
    assert_eq!(set.file_mut("Late.java").expect("lookup").code(), "prelude\nlate body");
}

#[test]
fn insertions_compose_across_lookups() {
    let dir = TempDir::new().expect("temp dir");
    seed(
        dir.path(),
        "Marked.java",
        indoc! {"
            // INSERT:'imports'
            class Marked {}"},
    );

    let mut set = SourceSet::from_directory(dir.path()).expect("read set");
    let point = InsertionPoint::new("imports");
    set.file_mut("Marked.java").expect("lookup").at(&point).add(&["import a.A;"]);
    set.file_mut("Marked.java").expect("lookup").at(&point).add(&["import b.B;"]);
    set.write().expect("flush");

    assert_eq!(
        fs::read_to_string(dir.path().join("Marked.java")).expect("content"),
        indoc! {"
            // INSERT:'imports'
            import a.A;
            import b.B;
            class Marked {}"},
    );
}
