use chrono::{DateTime, Utc};
use std::path::PathBuf;

// ─── OperationKind ────────────────────────────────────────────────────────

/// The four operations the seal tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Attach an integrity decorator to a file.
    Lock,
    /// Verify existing decorators; stdout carries a human-readable summary.
    Check,
    /// Strip decorators from a file.
    Remove,
    /// Set up the project (key material etc.). Operates on the cwd, so the
    /// target is a directory and never appears as a positional argument.
    Init,
}

impl OperationKind {
    /// The subcommand name on the seal tool's command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Lock => "lock",
            OperationKind::Check => "check",
            OperationKind::Remove => "remove",
            OperationKind::Init => "init",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── SealOperation ────────────────────────────────────────────────────────

/// Optional parameters; only meaningful for [`OperationKind::Init`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationOpts {
    /// Alternate key-file path, passed as `--key-file <path>`.
    pub key_file: Option<PathBuf>,
    /// Upload token, passed as `--upload-token <token>`.
    pub upload_token: Option<String>,
}

/// One trigger's worth of work: seal (or check/remove/init) a target path.
///
/// Created when a trigger fires — a file-change event or an explicit
/// command — and consumed when the subprocess completes or the operation is
/// superseded by a newer trigger for the same path.
#[derive(Debug, Clone)]
pub struct SealOperation {
    /// A file for `lock`/`check`/`remove`; the project directory for `init`.
    pub target: PathBuf,
    pub kind: OperationKind,
    pub opts: OperationOpts,
    pub started_at: DateTime<Utc>,
}

impl SealOperation {
    pub fn new(kind: OperationKind, target: impl Into<PathBuf>) -> Self {
        Self::with_opts(kind, target, OperationOpts::default())
    }

    pub fn with_opts(
        kind: OperationKind,
        target: impl Into<PathBuf>,
        opts: OperationOpts,
    ) -> Self {
        Self {
            target: target.into(),
            kind,
            opts,
            started_at: Utc::now(),
        }
    }
}

// ─── ExecutionResult ──────────────────────────────────────────────────────

/// What the subprocess did. Ephemeral — consumed immediately by the
/// classifier.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// `None` when the process was killed (timeout or signal).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}
