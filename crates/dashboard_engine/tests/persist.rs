use std::fs;

use dashboard_engine::{ensure_state_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("state").join("dashboard");
    assert!(!nested.exists());
    ensure_state_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn rewrite_replaces_previous_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("locations.ron", "(jobs: \"a=1\")").unwrap();
    assert_eq!(first.file_name().unwrap(), "locations.ron");
    let second = writer.write("locations.ron", "(jobs: \"a=2\")").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "(jobs: \"a=2\")");
    assert_eq!(
        writer.read("locations.ron").unwrap().as_deref(),
        Some("(jobs: \"a=2\")")
    );

    // Only the target remains; no temp files linger.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn reading_a_missing_file_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("never-created"));
    assert_eq!(writer.read("locations.ron").unwrap(), None);
}

#[test]
fn a_file_in_place_of_the_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let err = writer.write("locations.ron", "data").unwrap_err();
    assert!(matches!(err, PersistError::StateDir { .. }));
    assert!(!file_path.with_file_name("locations.ron").exists());
}
