use std::path::{Path, PathBuf};

use sealer_core::paths::CONFIG_FILE;

/// Resolve the session root directory.
///
/// Priority:
/// 1. `--root` flag / `SEALER_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.sealer.yaml`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut dir = cwd.clone();
    loop {
        if dir.join(CONFIG_FILE).is_file() {
            return dir;
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }

    let mut dir = cwd.clone();
    loop {
        if dir.join(".git").is_dir() {
            return dir;
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }

    cwd
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let other = TempDir::new().unwrap();
        // Explicit beats any marker-based detection.
        assert_eq!(resolve_root(Some(other.path())), other.path());
    }
}
