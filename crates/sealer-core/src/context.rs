use crate::config::Config;
use crate::interpreter;
use crate::paths;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ToolContext
// ---------------------------------------------------------------------------

/// Process-lifetime context for reaching the seal tool: the entry-point
/// path and the lazily resolved interpreter.
///
/// Constructed once at startup from the loaded [`Config`] and passed down
/// explicitly — reconfiguring means building a new context, so there is no
/// ambient mutable state and no cache invalidation to get wrong. Both
/// fields are read-only after resolution.
#[derive(Debug)]
pub struct ToolContext {
    tool_entry: PathBuf,
    interpreter_override: Option<String>,
    interpreter: OnceLock<String>,
}

impl ToolContext {
    pub fn new(config: &Config, root: &Path) -> Self {
        Self {
            tool_entry: paths::tool_entry(config, root),
            interpreter_override: config.interpreter.clone(),
            interpreter: OnceLock::new(),
        }
    }

    /// Entry-point script of the bundled seal tool. May not exist; the
    /// command builder checks.
    pub fn tool_entry(&self) -> &Path {
        &self.tool_entry
    }

    /// The interpreter to launch the tool with, probed on first use and
    /// cached for the life of this context.
    pub fn interpreter(&self) -> &str {
        self.interpreter
            .get_or_init(|| interpreter::resolve(self.interpreter_override.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpreter_is_resolved_once_and_cached() {
        let config = Config {
            interpreter: Some("my-python".into()),
            ..Default::default()
        };
        let ctx = ToolContext::new(&config, Path::new("/proj"));
        let first = ctx.interpreter() as *const str;
        let second = ctx.interpreter() as *const str;
        assert_eq!(ctx.interpreter(), "my-python");
        // Same allocation both times — resolution ran once.
        assert_eq!(first, second);
    }

    #[test]
    fn tool_entry_comes_from_config() {
        let config = Config {
            tool_path: Some(PathBuf::from("bundle/server.py")),
            ..Default::default()
        };
        let ctx = ToolContext::new(&config, Path::new("/proj"));
        assert_eq!(ctx.tool_entry(), Path::new("/proj/bundle/server.py"));
    }
}
