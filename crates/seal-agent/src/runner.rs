use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use sealer_core::{discovery, paths, ToolContext};

use crate::classify::{self, Outcome};
use crate::command;
use crate::exec;
use crate::report::{OperationReport, Reporter};
use crate::scheduler::ExecuteOp;
use crate::types::{OperationKind, OperationOpts, SealOperation};

/// Concurrent seal subprocesses during project initialization. Distinct
/// files are independent, but an unbounded fan-out would spawn one
/// interpreter per project file.
const INIT_PARALLELISM: usize = 4;

// ─── SealRunner ───────────────────────────────────────────────────────────

/// Drives one operation end to end: resolve interpreter → build argv →
/// run the subprocess → classify the outcome.
///
/// Every failure mode is folded into the report's [`Outcome`]; nothing
/// escapes a driving task as an unhandled fault.
pub struct SealRunner {
    ctx: Arc<ToolContext>,
    /// Fallback cwd for targets outside any known project.
    session_root: PathBuf,
    timeout: Duration,
}

impl SealRunner {
    pub fn new(ctx: Arc<ToolContext>, session_root: PathBuf, timeout: Duration) -> Self {
        Self {
            ctx,
            session_root,
            timeout,
        }
    }

    pub async fn seal(&self, op: &SealOperation) -> OperationReport {
        let outcome = self.drive(op).await;
        OperationReport::new(op, outcome)
    }

    async fn drive(&self, op: &SealOperation) -> Outcome {
        let interpreter = self.ctx.interpreter();
        let argv = match command::build_argv(self.ctx.tool_entry(), interpreter, op) {
            Ok(argv) => argv,
            Err(e) => return classify::classify_launch(&e),
        };

        let cwd = self.cwd_for(op);
        tracing::debug!(
            target_path = %op.target.display(),
            kind = %op.kind,
            cwd = %cwd.display(),
            "running seal tool"
        );

        match exec::run(&argv, &cwd, self.timeout).await {
            Ok(result) => classify::classify(op.kind, &result),
            Err(e) => classify::classify_launch(&e),
        }
    }

    /// `init` runs in its target directory (the tool operates on cwd).
    /// File operations run in the project root owning the file, falling
    /// back to the session root for strays.
    fn cwd_for(&self, op: &SealOperation) -> PathBuf {
        if op.kind == OperationKind::Init {
            return op.target.clone();
        }
        paths::project_root_for(&op.target).unwrap_or_else(|| self.session_root.clone())
    }
}

impl ExecuteOp for SealRunner {
    fn execute(&self, op: SealOperation) -> impl Future<Output = OperationReport> + Send {
        async move { self.seal(&op).await }
    }
}

// ─── Project initialization ───────────────────────────────────────────────

/// Aggregate result of `init` plus the follow-up whole-tree seal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitSummary {
    /// Whether the `init` run itself succeeded (including the
    /// already-initialized case).
    pub initialized: bool,
    pub already_initialized: bool,
    pub sealed: usize,
    pub failed: usize,
}

/// Initialize the project at `root`, then seal every discovered source
/// file.
///
/// The whole-tree seal is not atomic: each file is an independent unit of
/// work, failures don't abort the remaining files, and the summary reports
/// counts rather than pretending to roll back. An already-initialized
/// project is informational — existing keys are reused and the re-seal
/// still runs.
pub async fn init_project(
    runner: Arc<SealRunner>,
    root: &Path,
    opts: OperationOpts,
    extra_excludes: &[String],
    reporter: Arc<dyn Reporter>,
) -> InitSummary {
    let init_op = SealOperation::with_opts(OperationKind::Init, root, opts);
    reporter.started(&init_op);
    let init_report = runner.seal(&init_op).await;
    reporter.finished(&init_report);

    let already_initialized = init_report.outcome == Outcome::AlreadyInitialized;
    if !init_report.outcome.is_success() {
        return InitSummary {
            initialized: false,
            already_initialized: false,
            sealed: 0,
            failed: 0,
        };
    }

    let files = discovery::sealable_files(root, extra_excludes);
    let gate = Arc::new(Semaphore::new(INIT_PARALLELISM));
    let mut tasks = JoinSet::new();

    for file in files {
        let runner = Arc::clone(&runner);
        let reporter = Arc::clone(&reporter);
        let gate = Arc::clone(&gate);
        tasks.spawn(async move {
            // The gate is never closed, so acquisition only fails if the
            // semaphore is dropped — run ungated in that case.
            let _permit = gate.acquire_owned().await.ok();
            let op = SealOperation::new(OperationKind::Lock, file);
            reporter.started(&op);
            let report = runner.seal(&op).await;
            reporter.finished(&report);
            report.outcome.is_success()
        });
    }

    let (mut sealed, mut failed) = (0, 0);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => sealed += 1,
            Ok(false) => failed += 1,
            Err(e) => {
                tracing::error!("seal task failed to complete: {e}");
                failed += 1;
            }
        }
    }

    InitSummary {
        initialized: true,
        already_initialized,
        sealed,
        failed,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
