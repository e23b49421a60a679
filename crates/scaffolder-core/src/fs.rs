//! Directory helpers for preparing the output tree

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Remove `root` and everything below it, children before parents.
///
/// A missing `root` is not an error.
pub fn remove_dir_tree(root: &Path) -> Result<()> {
    remove_entries(root, 0)
}

/// Remove everything below `root` but keep `root` itself.
///
/// A missing `root` is not an error.
pub fn empty_dir(root: &Path) -> Result<()> {
    remove_entries(root, 1)
}

fn remove_entries(root: &Path, min_depth: usize) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(root).min_depth(min_depth).contents_first(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            fs::remove_dir(path)
                .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
        } else {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {}", path.display()))?;
        }
    }

    Ok(())
}

/// Drop `.` segments, so `<cwd>/.` and `<cwd>` name the same directory
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Create every missing ancestor of `path` (root first) so that `path` is a directory
pub fn ensure_dir(path: &Path) -> Result<()> {
    let mut missing: Vec<&Path> = path
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .take_while(|p| !p.is_dir())
        .collect();
    missing.reverse();

    for dir in missing {
        match fs::create_dir(dir) {
            Ok(()) => {}
            // Another writer may have created it between the check and now
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))
            }
        }
    }

    Ok(())
}

/// True when `path` has no entries. A directory that does not exist counts as empty.
pub fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let mut entries =
        fs::read_dir(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_dir_tree_removes_nested_content() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        fs::create_dir_all(root.join("src/components/__tests__")).unwrap();
        fs::write(root.join("package.json"), "{}").unwrap();
        fs::write(root.join("src/main.ts"), "").unwrap();
        fs::write(root.join("src/components/__tests__/a.spec.ts"), "").unwrap();
        fs::write(root.join(".gitignore"), "node_modules").unwrap();

        remove_dir_tree(&root).unwrap();

        assert!(!root.exists());
        assert!(tmp.path().exists());
    }

    #[test]
    fn test_empty_dir_keeps_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("work");
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::write(root.join("notes.txt"), "mine").unwrap();
        fs::write(root.join("src/components/a.vue"), "").unwrap();

        empty_dir(&root).unwrap();

        assert!(root.is_dir());
        assert!(is_dir_empty(&root).unwrap());
    }

    #[test]
    fn test_empty_dir_through_trailing_cur_dir() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("work");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("notes.txt"), "mine").unwrap();

        empty_dir(&root.join(".")).unwrap();

        assert!(root.is_dir());
        assert!(is_dir_empty(&root).unwrap());
    }

    #[test]
    fn test_normalize_path_drops_cur_dir() {
        assert_eq!(
            normalize_path(Path::new("/work/app/.")),
            PathBuf::from("/work/app")
        );
        assert_eq!(
            normalize_path(Path::new("./work/./app")),
            PathBuf::from("work/app")
        );
        assert_eq!(normalize_path(Path::new(".")), PathBuf::from("."));
    }

    #[test]
    fn test_remove_dir_tree_missing_root_is_noop() {
        let tmp = TempDir::new().unwrap();
        remove_dir_tree(&tmp.path().join("does-not-exist")).unwrap();
    }

    #[test]
    fn test_ensure_dir_creates_all_ancestors() {
        let tmp = TempDir::new().unwrap();
        let deep = tmp.path().join("a").join("b").join("c");

        ensure_dir(&deep).unwrap();
        assert!(deep.is_dir());

        // Idempotent
        ensure_dir(&deep).unwrap();
        assert!(deep.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_when_a_file_is_in_the_way() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("blocker"), "").unwrap();

        assert!(ensure_dir(&tmp.path().join("blocker").join("child")).is_err());
    }

    #[test]
    fn test_is_dir_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(is_dir_empty(tmp.path()).unwrap());
        assert!(is_dir_empty(&tmp.path().join("missing")).unwrap());

        fs::write(tmp.path().join("README.md"), "").unwrap();
        assert!(!is_dir_empty(tmp.path()).unwrap());
    }
}
