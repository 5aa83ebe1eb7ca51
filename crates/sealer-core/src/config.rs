use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Project-level configuration, loaded from `.sealer.yaml` at the project
/// root. Every field is optional; a missing file yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Interpreter override. When set, resolution skips probing and uses
    /// this value as-is.
    #[serde(default)]
    pub interpreter: Option<String>,

    /// Override for the seal-tool entry point. Relative paths are resolved
    /// against the project root.
    #[serde(default)]
    pub tool_path: Option<PathBuf>,

    /// Per-operation subprocess timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Key file handed to `init` as `--key-file`.
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Extra directory names excluded from discovery, on top of the
    /// built-in set.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_timeout_ms() -> u64 {
    60_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: None,
            tool_path: None,
            timeout_ms: default_timeout_ms(),
            key_file: None,
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Load the config from `<root>/.sealer.yaml`. A missing file is not an
    /// error — it yields `Config::default()`.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
