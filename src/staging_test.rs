use super::*;
use std::fs;
use tempfile::TempDir;

fn host_files(dir: &Path) -> Files {
    fs::write(dir.join("index.md"), "# Host index").unwrap();
    fs::write(dir.join("about.md"), "# About").unwrap();
    Files::from_dir(dir).unwrap()
}

#[test]
fn test_write_then_resolve_overlays_host_files() {
    let host_dir = TempDir::new().unwrap();
    let host = host_files(host_dir.path());
    let staged = StagedFiles::new().unwrap();

    staged.write("guide/doc.md", b"# Guide").unwrap();
    staged.write("index.md", b"# Imported index").unwrap();

    let merged = staged.resolve(&host).unwrap();

    assert_eq!(merged.len(), 3);
    assert_eq!(merged.read("guide/doc.md").unwrap(), b"# Guide");
    assert_eq!(merged.read("index.md").unwrap(), b"# Imported index");
    assert_eq!(merged.read("about.md").unwrap(), b"# About");

    // ホスト側のコレクションは変更されない
    assert_eq!(host.len(), 2);
    assert_eq!(host.read("index.md").unwrap(), b"# Host index");
}

#[test]
fn test_newest_write_wins() {
    let staged = StagedFiles::new().unwrap();

    staged.write("doc.md", b"first").unwrap();
    staged.write("doc.md", b"second").unwrap();

    let merged = staged.resolve(&Files::new()).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.read("doc.md").unwrap(), b"second");
}

#[test]
fn test_open_stream_registers_on_finish() {
    let staged = StagedFiles::new().unwrap();

    let mut writer = staged.open("stream.md").unwrap();
    writer.write_all(b"# Part 1\n").unwrap();
    writer.write_all(b"# Part 2\n").unwrap();

    assert!(staged.staged_uris().is_empty());
    writer.finish().unwrap();

    assert_eq!(staged.staged_uris(), vec!["stream.md".to_string()]);
    let merged = staged.resolve(&Files::new()).unwrap();
    assert_eq!(merged.read("stream.md").unwrap(), b"# Part 1\n# Part 2\n");
}

#[test]
fn test_dropped_writer_is_not_registered() {
    let staged = StagedFiles::new().unwrap();

    {
        let mut writer = staged.open("partial.md").unwrap();
        writer.write_all(b"incomplete").unwrap();
    }

    assert!(staged.staged_uris().is_empty());
    assert!(!staged.resolve(&Files::new()).unwrap().contains("partial.md"));
}

#[test]
fn test_rejects_escaping_paths() {
    let staged = StagedFiles::new().unwrap();

    for uri in ["", "../outside.md", "/etc/passwd", "a/../../b.md"] {
        let err = staged.write(uri, b"x").unwrap_err();
        assert!(matches!(err, ImportError::Staging(_)), "{uri}");
    }
}

#[test]
fn test_release_removes_temp_dir() {
    let staged = StagedFiles::new().unwrap();
    staged.write("a/b/c.md", b"content").unwrap();
    let root = staged.root().to_path_buf();
    assert!(root.exists());

    staged.release().unwrap();

    assert!(!root.exists());
    assert!(staged.is_released());
}

#[test]
fn test_release_is_idempotent_without_writes() {
    let staged = StagedFiles::new().unwrap();
    let root = staged.root().to_path_buf();

    staged.release().unwrap();
    staged.release().unwrap();

    assert!(!root.exists());
}

#[test]
fn test_use_after_release_fails() {
    let staged = StagedFiles::new().unwrap();
    staged.release().unwrap();

    assert!(matches!(
        staged.write("doc.md", b"x"),
        Err(ImportError::Staging(_))
    ));
    assert!(matches!(
        staged.resolve(&Files::new()),
        Err(ImportError::Staging(_))
    ));
}

#[test]
fn test_drop_removes_temp_dir() {
    let root = {
        let staged = StagedFiles::new().unwrap();
        staged.write("doc.md", b"x").unwrap();
        staged.root().to_path_buf()
    };
    assert!(!root.exists());
}

#[test]
fn test_new_in_creates_under_parent() {
    let parent = TempDir::new().unwrap();
    let staging_parent = parent.path().join("staging");

    let staged = StagedFiles::new_in(&staging_parent).unwrap();
    assert!(staged.root().starts_with(&staging_parent));

    staged.release().unwrap();
    assert_eq!(fs::read_dir(&staging_parent).unwrap().count(), 0);
}
