//! Filesystem helpers for RBook built on `cap-std` and `camino`.
//!
//! Templates, stylesheets and output documents are all addressed by UTF-8
//! paths taken from operator configuration, so every helper here resolves an
//! ambient directory for the parent and operates on the final file name.
#![forbid(unsafe_code)]

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Resolve an ambient directory for the given path and return the directory with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Read a whole UTF-8 text file.
pub fn read_utf8_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read_to_string(name.as_str())
}

/// Create (or truncate) a file for writing, creating missing parent directories first.
pub fn create_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    dir.create(name.as_str())
}

/// Ensure the parent directory for `path` exists, handling absolute paths safely for cap-std.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)?;
    Ok(())
}

/// Return whether a path exists and is a regular file using capability-based IO.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Return whether `path` names a regular file, treating every lookup failure as absence.
///
/// Template and stylesheet lookups are optional, so a missing parent
/// directory is no different from a missing file.
#[must_use]
pub fn regular_file_exists(path: &Utf8Path) -> bool {
    file_is_file(path).unwrap_or(false)
}

/// Split a parent path into an ambient base directory and the part beneath it.
///
/// Absolute paths are rooted at their prefix and root (`/` or `C:\`);
/// relative paths hang off the current directory.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let mut base = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in parent.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => base.push(component),
            _ => relative.push(component),
        }
    }
    if base.as_str().is_empty() {
        base.push(".");
    }
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use tempfile::TempDir;

    #[fixture]
    fn scratch() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        (dir, root)
    }

    #[rstest]
    fn create_makes_missing_parents(scratch: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = scratch;
        let target = root.join("out").join("nested").join("book.html");
        let mut file = create_utf8_file(&target).expect("create file");
        file.write_all(b"<html></html>").expect("write file");
        drop(file);

        assert!(regular_file_exists(&target));
        let contents = read_utf8_to_string(&target).expect("read back");
        assert_eq!(contents, "<html></html>");
    }

    #[rstest]
    fn missing_files_are_not_regular_files(scratch: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = scratch;
        assert!(!regular_file_exists(&root.join("absent.html")));
        assert!(!regular_file_exists(&root.join("no-such-dir").join("absent.html")));
    }

    #[rstest]
    fn directories_are_not_regular_files(scratch: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = scratch;
        std::fs::create_dir(root.join("templates").as_std_path()).expect("mkdir");
        assert!(!regular_file_exists(&root.join("templates")));
    }

    #[rstest]
    fn read_reports_missing_files(scratch: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = scratch;
        let err = read_utf8_to_string(&root.join("absent.css")).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn relative_parents_hang_off_the_current_directory() {
        let (_dir, relative) =
            base_dir_and_relative(Utf8Path::new("out/nested")).expect("split parent");
        assert_eq!(relative, Utf8PathBuf::from("out/nested"));
    }

    #[cfg(unix)]
    #[rstest]
    fn absolute_parents_are_rooted(scratch: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = scratch;
        let (_base, relative) = base_dir_and_relative(&root).expect("split parent");
        assert_eq!(Utf8Path::new("/").join(&relative), root);
    }
}
