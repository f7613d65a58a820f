//! Reading the input stylesheet and replacing the output file.

use anyhow::{Context as _, Result};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read the whole stylesheet as UTF-8.
pub fn read_stylesheet(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// `dir/name.ext` -> `dir/name.backup.ext`; `dir/name` -> `dir/name.backup`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(".backup");
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}

/// Replace `path` with `contents`, keeping the previous file as a single backup.
///
/// The new contents are staged in a temporary file next to `path` and renamed
/// over it, so `path` holds either the old or the new contents, never a mix.
/// The previous file is copied to the backup before the rename; an older
/// backup is overwritten. Returns the backup location when one was made.
pub fn write_with_backup(path: &Path, contents: &str) -> Result<Option<PathBuf>> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;
    staged
        .write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", staged.path().display()))?;

    let backup = if path.exists() {
        let backup = backup_path(path);
        fs::copy(path, &backup).with_context(|| {
            format!("failed to copy {} to {}", path.display(), backup.display())
        })?;
        Some(backup)
    } else {
        None
    };

    staged
        .persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_names() {
        assert_eq!(
            backup_path(Path::new("out/styles_compiled.css")),
            Path::new("out/styles_compiled.backup.css")
        );
        assert_eq!(backup_path(Path::new("bundle")), Path::new("bundle.backup"));
    }

    #[test]
    fn first_write_makes_no_backup() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.css");
        let backup = write_with_backup(&target, "a {}\n").unwrap();
        assert_eq!(backup, None);
        assert_eq!(fs::read_to_string(&target).unwrap(), "a {}\n");
    }

    #[test]
    fn rewrites_keep_exactly_one_backup_generation() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.css");
        write_with_backup(&target, "one\n").unwrap();
        let backup = write_with_backup(&target, "two\n").unwrap();
        assert_eq!(backup.as_deref(), Some(dir.path().join("out.backup.css").as_path()));
        write_with_backup(&target, "three\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "three\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("out.backup.css")).unwrap(),
            "two\n"
        );
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["out.backup.css", "out.css"]);
    }

    #[test]
    fn failed_write_leaves_destination_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.css");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.css"), "kept\n").unwrap();

        assert!(write_with_backup(&target, "new\n").is_err());
        assert!(target.is_dir());
        assert_eq!(fs::read_to_string(target.join("keep.css")).unwrap(), "kept\n");
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.css"]);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_stylesheet(&dir.path().join("missing.css")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
