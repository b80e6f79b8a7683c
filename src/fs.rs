use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub(crate) fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).context(format!("Unable to create directory {}", path.display()))
}

/// Reads a file to a `String`, returning `None` when the file does not exist.
pub(crate) fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context(format!("Unable to read file {}", path.display())),
    }
}

/// Replaces the contents of `path` by writing a sibling temp file and renaming it into place, so a
/// reader sees either the old contents or the new contents.
pub(crate) fn write_atomic(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let tmp = tmp_path(path);
    std::fs::write(&tmp, data).context(format!("Unable to write data to {}", tmp.display()))?;
    std::fs::rename(&tmp, path).context(format!(
        "Unable to move '{}' to '{}'",
        tmp.display(),
        path.display()
    ))
}

/// Removes a file. A file that is already gone is not an error.
pub(crate) fn remove_optional(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context(format!("Unable to remove file {}", path.display())),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[test]
fn write_atomic_replaces_contents_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let path = tempdir.path().join("transactions");
    write_atomic(&path, "[1]").unwrap();
    write_atomic(&path, "[1,2]").unwrap();
    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[1,2]"));
    assert!(!tmp_path(&path).exists());
}

#[test]
fn read_optional_missing_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    assert!(read_optional(tempdir.path().join("nope")).unwrap().is_none());
}

#[test]
fn remove_optional_missing_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let path = tempdir.path().join("x");
    remove_optional(&path).unwrap();
    write_atomic(&path, "1").unwrap();
    remove_optional(&path).unwrap();
    assert!(!path.exists());
}
