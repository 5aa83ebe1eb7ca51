//! Interpreter resolution for the seal tool.
//!
//! The seal tool is a Python script, so we need a working `python3` (or
//! `python`) to launch it. Resolution order:
//! 1. configured override — trusted as-is, no probe
//! 2. `python3`, if it can be found and answers `--version`
//! 3. `python`, likewise
//!
//! When every probe fails the default name `python3` is returned anyway:
//! the spawn failure then flows through the executor and classifier, which
//! produce a far better user message than failing here would.

use std::process::{Command, Stdio};

pub const DEFAULT_INTERPRETER: &str = "python3";
const CANDIDATES: &[&str] = &["python3", "python"];

/// Resolve an interpreter name or path. Never fails; see module docs.
///
/// Callers cache the result for the process lifetime (`ToolContext`) —
/// interpreter location rarely changes mid-session.
pub fn resolve(configured: Option<&str>) -> String {
    if let Some(explicit) = configured {
        return explicit.to_string();
    }

    for candidate in CANDIDATES {
        if probe(candidate) {
            return (*candidate).to_string();
        }
    }

    tracing::warn!("no working python interpreter found, defaulting to {DEFAULT_INTERPRETER}");
    DEFAULT_INTERPRETER.to_string()
}

/// `true` if `name` is on PATH and exits cleanly from a trivial
/// version check.
fn probe(name: &str) -> bool {
    let Ok(path) = which::which(name) else {
        return false;
    };
    Command::new(path)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
