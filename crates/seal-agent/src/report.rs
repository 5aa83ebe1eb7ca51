use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::classify::Outcome;
use crate::types::{OperationKind, SealOperation};

// ─── OperationReport ──────────────────────────────────────────────────────

/// Terminal result of one seal operation, handed to the [`Reporter`].
#[derive(Debug, Clone)]
pub struct OperationReport {
    pub target: PathBuf,
    pub kind: OperationKind,
    pub started_at: DateTime<Utc>,
    pub outcome: Outcome,
}

impl OperationReport {
    pub fn new(op: &SealOperation, outcome: Outcome) -> Self {
        Self {
            target: op.target.clone(),
            kind: op.kind,
            started_at: op.started_at,
            outcome,
        }
    }

    /// Wall-clock time since the triggering operation was created.
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds()
    }

    /// The user-facing one-liner for this report.
    pub fn message(&self) -> String {
        self.outcome.user_message(self.kind)
    }
}

// ─── Reporter ─────────────────────────────────────────────────────────────

/// Seam for surfacing progress and terminal status.
///
/// The scheduler's driving task calls `started` when a run begins and
/// `finished` when it completes; each operation owns its own report lines,
/// so implementations never share state across operations. The CLI plugs in
/// a console implementation; tests plug in recorders.
pub trait Reporter: Send + Sync {
    fn started(&self, op: &SealOperation);
    fn finished(&self, report: &OperationReport);
}

/// Reporter that writes through `tracing` — the default for embedders that
/// install their own subscriber.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn started(&self, op: &SealOperation) {
        tracing::info!(target_path = %op.target.display(), kind = %op.kind, "seal operation started");
    }

    fn finished(&self, report: &OperationReport) {
        if report.outcome.is_success() {
            tracing::info!(
                target_path = %report.target.display(),
                elapsed_ms = report.elapsed_ms(),
                "{}",
                report.message()
            );
        } else {
            tracing::warn!(
                target_path = %report.target.display(),
                elapsed_ms = report.elapsed_ms(),
                "{}",
                report.message()
            );
        }
    }
}
