//! # Workspace Module
//!
//! Session directory resolution and data-file listing.
//!
//! `resolve_dir` is deliberately pure with respect to process state: it
//! creates and returns the directory but never changes the process's working
//! directory. Callers that want to work *inside* the session directory opt
//! in explicitly:
//!
//! ```rust,no_run
//! # fn main() -> photometry_kit::Result<()> {
//! let session = photometry_kit::workspace::resolve_dir("/data", ["mouse_42", "day_3"])?;
//! std::env::set_current_dir(&session)?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, WorkspaceError};

/// Join `base` with each element of `parts`, creating the chain if missing
///
/// Returns the resolved path. Calling it again with the same arguments is a
/// no-op that returns the same path.
pub fn resolve_dir<P, I, S>(base: P, parts: I) -> Result<PathBuf>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut path = base.as_ref().to_path_buf();
    for part in parts {
        path.push(part.as_ref());
    }

    if path.exists() {
        if !path.is_dir() {
            return Err(WorkspaceError::NotADirectory {
                path: path.display().to_string(),
            }
            .into());
        }
        debug!("Directory {} already exists", path.display());
    } else {
        fs::create_dir_all(&path).map_err(|e| {
            debug!("create_dir_all failed for {}: {}", path.display(), e);
            WorkspaceError::CreateFailed {
                path: path.display().to_string(),
            }
        })?;
        info!("Created directory {}", path.display());
    }

    Ok(path)
}

/// List immediate-child files of `dir` whose name ends with `suffix`
///
/// An empty suffix matches every file. Directories never match and nested
/// folders are not entered. The result is sorted for determinism.
pub fn list_files<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|_| WorkspaceError::ReadFailed {
        path: dir.display().to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && name_ends_with(path, suffix))
        .collect();

    files.sort();
    Ok(files)
}

/// List every file under `dir` (any depth) whose name ends with `suffix`
///
/// Depth-first walk; for any `dir`/`suffix` the result is a superset of
/// `list_files(dir, suffix)`.
pub fn list_files_recursive<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    walk(dir, suffix, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, suffix: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|_| WorkspaceError::ReadFailed {
        path: dir.display().to_string(),
    })?;

    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, suffix, out)?;
        } else if path.is_file() && name_ends_with(&path, suffix) {
            out.push(path);
        }
    }
    Ok(())
}

fn name_ends_with(path: &Path, suffix: &str) -> bool {
    if suffix.is_empty() {
        return true;
    }
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(suffix))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_resolve_dir_creates_nested_chain() {
        let root = tempdir().unwrap();
        let path = resolve_dir(root.path(), ["mouse_42", "day_3"]).unwrap();
        assert!(path.is_dir());
        assert!(path.ends_with("mouse_42/day_3"));
    }

    #[test]
    fn test_resolve_dir_is_idempotent() {
        let root = tempdir().unwrap();
        let first = resolve_dir(root.path(), ["session"]).unwrap();
        let second = resolve_dir(root.path(), ["session"]).unwrap();
        assert_eq!(first, second);
        assert!(second.is_dir());
    }

    #[test]
    fn test_resolve_dir_rejects_existing_file() {
        let root = tempdir().unwrap();
        touch(&root.path().join("taken"));
        let result = resolve_dir(root.path(), ["taken"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_files_matches_suffix_only_at_top_level() {
        let root = tempdir().unwrap();
        touch(&root.path().join("a.csv"));
        touch(&root.path().join("b.csv"));
        touch(&root.path().join("notes.txt"));
        fs::create_dir(root.path().join("nested")).unwrap();
        touch(&root.path().join("nested").join("c.csv"));

        let files = list_files(root.path(), ".csv").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_list_files_empty_suffix_matches_all_files_but_no_dirs() {
        let root = tempdir().unwrap();
        touch(&root.path().join("a.csv"));
        touch(&root.path().join("b.txt"));
        fs::create_dir(root.path().join("sub")).unwrap();

        let files = list_files(root.path(), "").unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_recursive_listing_is_superset_of_flat() {
        let root = tempdir().unwrap();
        touch(&root.path().join("top.csv"));
        let deep = root.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        touch(&deep.join("deep.csv"));
        touch(&deep.join("other.txt"));

        let flat = list_files(root.path(), ".csv").unwrap();
        let all = list_files_recursive(root.path(), ".csv").unwrap();

        assert_eq!(flat.len(), 1);
        assert_eq!(all.len(), 2);
        for path in &flat {
            assert!(all.contains(path));
        }
    }

    #[test]
    fn test_list_files_missing_dir_is_an_error() {
        let root = tempdir().unwrap();
        assert!(list_files(root.path().join("nope"), "").is_err());
    }
}
