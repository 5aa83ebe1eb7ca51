//! Project file discovery for whole-tree sealing.
//!
//! Used by `init`, which seals every Python source in the project. Each
//! call re-walks the tree — project trees mutate, so nothing is cached
//! across calls.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SealerError};

/// Directory names skipped at any depth, by exact name match. Covers
/// version control, virtualenvs, dependency trees, and build caches.
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".venv",
    "venv",
    "env",
    ".tox",
    "node_modules",
    "site-packages",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".eggs",
    "build",
    "dist",
];

/// `true` if `path` is a file the seal tool understands.
pub fn is_sealable(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}

/// Validate an explicit command target before dispatch: it must exist and
/// be a sealable source file.
pub fn ensure_sealable(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SealerError::TargetNotFound(path.to_path_buf()));
    }
    if !path.is_file() || !is_sealable(path) {
        return Err(SealerError::NotSealable(path.to_path_buf()));
    }
    Ok(())
}

/// `true` if a directory with this name is pruned from the walk.
pub fn is_excluded_dir(name: &str, extra: &[String]) -> bool {
    EXCLUDED_DIRS.contains(&name) || extra.iter().any(|e| e == name)
}

/// Collect every sealable file under `root`, pruning excluded directories.
///
/// Unreadable subtrees (permission denied, deleted mid-walk) are logged and
/// skipped — a single bad directory never aborts the walk.
pub fn sealable_files(root: &Path, extra_excludes: &[String]) -> Vec<PathBuf> {
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        // Never filter the root itself, whatever the project dir is named.
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !is_excluded_dir(&name, extra_excludes)
    });

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(e) if e.file_type().is_file() && is_sealable(e.path()) => {
                files.push(e.into_path());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("skipping unreadable entry during discovery: {e}");
            }
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn collects_python_files_only() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.py"));
        touch(&dir.path().join("pkg/b.py"));
        touch(&dir.path().join("README.md"));
        touch(&dir.path().join("pkg/data.json"));

        let mut found = sealable_files(dir.path(), &[]);
        found.sort();
        assert_eq!(
            found,
            vec![dir.path().join("a.py"), dir.path().join("pkg/b.py")]
        );
    }

    #[test]
    fn excluded_dirs_are_pruned_at_any_depth() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/ok.py"));
        touch(&dir.path().join("node_modules/dep/setup.py"));
        touch(&dir.path().join(".git/hooks/hook.py"));
        touch(&dir.path().join("src/deep/.venv/lib/site.py"));
        touch(&dir.path().join("src/deep/__pycache__/ok.cpython-312.py"));

        let found = sealable_files(dir.path(), &[]);
        assert_eq!(found, vec![dir.path().join("src/ok.py")]);
    }

    #[test]
    fn config_excludes_extend_the_builtin_set() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("keep.py"));
        touch(&dir.path().join("generated/skip.py"));

        let found = sealable_files(dir.path(), &["generated".to_string()]);
        assert_eq!(found, vec![dir.path().join("keep.py")]);
    }

    #[test]
    fn exclusion_is_by_name_not_by_substring() {
        let dir = TempDir::new().unwrap();
        // "buildings" must not be caught by the "build" exclusion.
        touch(&dir.path().join("buildings/ok.py"));
        touch(&dir.path().join("build/skip.py"));

        let found = sealable_files(dir.path(), &[]);
        assert_eq!(found, vec![dir.path().join("buildings/ok.py")]);
    }

    #[test]
    fn ensure_sealable_distinguishes_missing_from_wrong_type() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("ghost.py");
        assert!(matches!(
            ensure_sealable(&missing),
            Err(crate::SealerError::TargetNotFound(_))
        ));

        let readme = dir.path().join("README.md");
        std::fs::write(&readme, "").unwrap();
        assert!(matches!(
            ensure_sealable(&readme),
            Err(crate::SealerError::NotSealable(_))
        ));

        let source = dir.path().join("app.py");
        std::fs::write(&source, "").unwrap();
        assert!(ensure_sealable(&source).is_ok());
    }

    #[test]
    fn missing_root_yields_a_logged_skip_not_a_panic() {
        let found = sealable_files(Path::new("/no/such/tree/anywhere"), &[]);
        assert!(found.is_empty());
    }
}
