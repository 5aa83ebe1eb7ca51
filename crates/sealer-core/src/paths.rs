use crate::config::Config;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = ".sealer.yaml";

/// Location of the bundled seal-tool entry point, relative to the directory
/// holding the running executable.
pub const TOOL_ENTRY_REL: &str = "bundled/tool/server.py";

pub const TOOL_PATH_ENV: &str = "SEALER_TOOL_PATH";
pub const ROOT_ENV: &str = "SEALER_ROOT";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve the seal-tool entry point.
///
/// Priority:
/// 1. `tool_path` from config (relative paths resolved against `root`)
/// 2. `SEALER_TOOL_PATH` env var
/// 3. `bundled/tool/server.py` next to the running executable
///
/// Existence is NOT checked here — the command builder validates the path
/// and produces the tool-missing outcome, so the error surfaces on the
/// operation that needs it rather than at startup.
pub fn tool_entry(config: &Config, root: &Path) -> PathBuf {
    if let Some(p) = &config.tool_path {
        if p.is_absolute() {
            return p.clone();
        }
        return root.join(p);
    }

    if let Ok(p) = std::env::var(TOOL_PATH_ENV) {
        return PathBuf::from(p);
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|d| d.join(TOOL_ENTRY_REL)))
        .unwrap_or_else(|| PathBuf::from(TOOL_ENTRY_REL))
}

/// Find the project root owning `target`: the nearest ancestor containing
/// `.sealer.yaml` or `.git/`. Returns `None` when the target lies outside
/// any known project — callers fall back to the session root.
pub fn project_root_for(target: &Path) -> Option<PathBuf> {
    let start = if target.is_dir() {
        target
    } else {
        target.parent()?
    };

    let mut dir = start;
    loop {
        if dir.join(CONFIG_FILE).is_file() || dir.join(".git").is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_tool_path_wins_and_joins_root() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            tool_path: Some(PathBuf::from("tools/seal.py")),
            ..Default::default()
        };
        assert_eq!(tool_entry(&cfg, dir.path()), dir.path().join("tools/seal.py"));
    }

    #[test]
    fn absolute_config_tool_path_is_untouched() {
        let dir = TempDir::new().unwrap();
        let abs = dir.path().join("seal.py");
        let cfg = Config {
            tool_path: Some(abs.clone()),
            ..Default::default()
        };
        assert_eq!(tool_entry(&cfg, Path::new("/elsewhere")), abs);
    }

    #[test]
    fn project_root_found_via_marker() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let nested = dir.path().join("pkg/sub");
        std::fs::create_dir_all(&nested).unwrap();
        let file = nested.join("mod.py");
        std::fs::write(&file, "").unwrap();

        assert_eq!(project_root_for(&file), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn project_root_found_via_git_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let file = dir.path().join("main.py");
        std::fs::write(&file, "").unwrap();

        assert_eq!(project_root_for(&file), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn no_marker_yields_none() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("stray.py");
        std::fs::write(&file, "").unwrap();
        // The tempdir has no marker; ancestors (e.g. /tmp) are assumed
        // marker-free on test machines.
        assert_eq!(project_root_for(&file), None);
    }
}
