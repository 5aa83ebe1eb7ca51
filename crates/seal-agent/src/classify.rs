//! Outcome taxonomy for seal-tool runs.
//!
//! The tool's output contract is free text, so classification works by
//! substring match over the lowercased combined output. Unmatched failures
//! fall through to [`Outcome::ToolFailed`] with the raw output attached —
//! shown verbatim, never swallowed, since this layer cannot interpret
//! tool-internal semantics.

use crate::error::SealAgentError;
use crate::types::{ExecutionResult, OperationKind};

// ─── Outcome ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exit 0. For `check`, `summary` carries the tool's stdout report.
    Sealed { summary: Option<String> },
    /// Informational, not a failure: the project was set up previously.
    AlreadyInitialized,
    /// The resolved interpreter could not be launched at all.
    InterpreterNotFound { interpreter: String },
    /// The bundled entry point is absent or cannot load its libraries.
    ToolMissing { detail: String },
    /// Nonzero exit with tool-specific output, surfaced verbatim.
    ToolFailed { message: String },
    /// The run exceeded the configured timeout and was terminated.
    TimedOut,
}

impl Outcome {
    /// Informational outcomes count as success for exit-code purposes.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Sealed { .. } | Outcome::AlreadyInitialized)
    }

    /// One-line user-facing message, tailored per outcome. Actionable
    /// failures carry their remediation step.
    pub fn user_message(&self, kind: OperationKind) -> String {
        match self {
            Outcome::Sealed { summary } => match kind {
                OperationKind::Lock => "sealed".to_string(),
                OperationKind::Check => summary
                    .clone()
                    .unwrap_or_else(|| "integrity check passed".to_string()),
                OperationKind::Remove => "seal removed".to_string(),
                OperationKind::Init => "project initialized".to_string(),
            },
            Outcome::AlreadyInitialized => {
                "project already initialized — keys left untouched".to_string()
            }
            Outcome::InterpreterNotFound { interpreter } => format!(
                "could not launch '{interpreter}': install Python 3 or set `interpreter` in .sealer.yaml"
            ),
            Outcome::ToolMissing { detail } => format!(
                "seal tool not found ({detail}): reinstall sealer or set `tool_path` in .sealer.yaml"
            ),
            Outcome::ToolFailed { message } => format!("seal tool failed: {message}"),
            Outcome::TimedOut => {
                "seal tool did not finish within the timeout and was terminated".to_string()
            }
        }
    }
}

// ─── Classification ───────────────────────────────────────────────────────

/// Map a completed run to an [`Outcome`].
pub fn classify(kind: OperationKind, result: &ExecutionResult) -> Outcome {
    if result.timed_out {
        return Outcome::TimedOut;
    }

    if result.success() {
        let summary = match kind {
            OperationKind::Check if !result.stdout.trim().is_empty() => {
                Some(result.stdout.trim().to_string())
            }
            _ => None,
        };
        return Outcome::Sealed { summary };
    }

    let haystack = format!("{}\n{}", result.stderr, result.stdout).to_lowercase();

    // NOTE: the tool's phrase set is not contractually pinned down; these
    // are the phrases its bundled entry point is known to emit. Anything
    // else stays a verbatim ToolFailed.
    if haystack.contains("already initialized") {
        return Outcome::AlreadyInitialized;
    }
    if haystack.contains("could not import") || haystack.contains("libs directory not found") {
        return Outcome::ToolMissing {
            detail: first_line(&result.stderr),
        };
    }

    Outcome::ToolFailed {
        message: failure_message(result),
    }
}

/// Map a launch failure (argv construction or spawn) to an [`Outcome`].
pub fn classify_launch(err: &SealAgentError) -> Outcome {
    match err {
        SealAgentError::ToolMissing(path) => Outcome::ToolMissing {
            detail: path.display().to_string(),
        },
        SealAgentError::Spawn { program, source }
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            Outcome::InterpreterNotFound {
                interpreter: program.clone(),
            }
        }
        other => Outcome::ToolFailed {
            message: other.to_string(),
        },
    }
}

/// Exit code plus a short tail of whatever the tool said.
fn failure_message(result: &ExecutionResult) -> String {
    let said = if result.stderr.trim().is_empty() {
        result.stdout.trim()
    } else {
        result.stderr.trim()
    };
    let hint: String = said.chars().take(500).collect();
    match (result.exit_code, hint.is_empty()) {
        (Some(code), true) => format!("exit code {code}"),
        (Some(code), false) => format!("exit code {code}: {hint}"),
        (None, true) => "terminated by signal".to_string(),
        (None, false) => format!("terminated by signal: {hint}"),
    }
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(stderr: &str) -> ExecutionResult {
        ExecutionResult {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: stderr.to_string(),
            timed_out: false,
        }
    }

    #[test]
    fn already_initialized_is_case_insensitive_and_not_a_failure() {
        let outcome = classify(
            OperationKind::Init,
            &failed("Error: project Already Initialized, aborting"),
        );
        assert_eq!(outcome, Outcome::AlreadyInitialized);
        assert!(outcome.is_success());
    }

    #[test]
    fn import_complaint_means_tool_missing() {
        let outcome = classify(
            OperationKind::Lock,
            &failed("Error: Could not import the sealing library"),
        );
        assert!(matches!(outcome, Outcome::ToolMissing { .. }));
    }

    #[test]
    fn unmatched_failure_surfaces_verbatim() {
        let outcome = classify(OperationKind::Lock, &failed("KeyError: 'signing_key'"));
        match outcome {
            Outcome::ToolFailed { message } => {
                assert!(message.contains("exit code 1"));
                assert!(message.contains("KeyError: 'signing_key'"));
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[test]
    fn timeout_wins_over_everything() {
        let result = ExecutionResult {
            exit_code: None,
            stdout: String::new(),
            stderr: "already initialized".to_string(),
            timed_out: true,
        };
        assert_eq!(classify(OperationKind::Lock, &result), Outcome::TimedOut);
    }

    #[test]
    fn check_success_carries_the_stdout_summary() {
        let result = ExecutionResult {
            exit_code: Some(0),
            stdout: "3 functions sealed, all signatures valid\n".to_string(),
            stderr: String::new(),
            timed_out: false,
        };
        let outcome = classify(OperationKind::Check, &result);
        assert_eq!(
            outcome,
            Outcome::Sealed {
                summary: Some("3 functions sealed, all signatures valid".to_string())
            }
        );
    }

    #[test]
    fn lock_success_has_no_summary() {
        let result = ExecutionResult {
            exit_code: Some(0),
            stdout: "noise\n".to_string(),
            ..Default::default()
        };
        assert_eq!(
            classify(OperationKind::Lock, &result),
            Outcome::Sealed { summary: None }
        );
    }

    #[test]
    fn spawn_not_found_is_interpreter_not_found() {
        let err = SealAgentError::Spawn {
            program: "python3".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(
            classify_launch(&err),
            Outcome::InterpreterNotFound {
                interpreter: "python3".to_string()
            }
        );
    }

    #[test]
    fn missing_entry_point_is_tool_missing_with_path() {
        let err = SealAgentError::ToolMissing("/opt/sealer/server.py".into());
        match classify_launch(&err) {
            Outcome::ToolMissing { detail } => assert!(detail.contains("server.py")),
            other => panic!("expected ToolMissing, got {other:?}"),
        }
    }

    #[test]
    fn messages_carry_remediation_hints() {
        let msg = Outcome::InterpreterNotFound {
            interpreter: "python3".into(),
        }
        .user_message(OperationKind::Lock);
        assert!(msg.contains(".sealer.yaml"));

        let msg = Outcome::ToolMissing {
            detail: "x".into(),
        }
        .user_message(OperationKind::Lock);
        assert!(msg.contains("reinstall"));
    }
}
