//! Per-target-path operation scheduling.
//!
//! At most one seal operation runs per target path at any instant. A
//! trigger for a path that is already busy does not queue unboundedly:
//! it lands in a single `pending` slot, replacing whatever was there —
//! the most recent trigger wins, and exactly one follow-up run happens
//! after the current one completes. Editors and watchers fire save events
//! in rapid bursts (auto-save, format-on-save chains); running the tool
//! once per burst entry would waste work and risk the tool reading a
//! half-written file.
//!
//! Operations for distinct paths are independent and run concurrently.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::report::{OperationReport, Reporter};
use crate::types::SealOperation;

// ─── ExecuteOp ────────────────────────────────────────────────────────────

/// The scheduler's view of "run one operation to completion". Implemented
/// by [`crate::SealRunner`]; tests implement it with mocks.
pub trait ExecuteOp: Send + Sync + 'static {
    fn execute(&self, op: SealOperation) -> impl Future<Output = OperationReport> + Send;
}

// ─── Scheduler ────────────────────────────────────────────────────────────

/// Disposition of a submitted trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// The path was idle; a driving task now runs this operation.
    Started,
    /// The path is busy; this operation took the single pending slot
    /// (displacing any older pending trigger) and will run once the
    /// current run completes.
    Coalesced,
}

/// Per-path state while a driving task is alive. Presence of the map entry
/// is the in-flight marker.
struct TargetState {
    pending: Option<SealOperation>,
}

pub struct Scheduler<E> {
    exec: Arc<E>,
    reporter: Arc<dyn Reporter>,
    targets: Arc<Mutex<HashMap<PathBuf, TargetState>>>,
    drained: Arc<Notify>,
}

impl<E: ExecuteOp> Scheduler<E> {
    pub fn new(exec: Arc<E>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            exec,
            reporter,
            targets: Arc::new(Mutex::new(HashMap::new())),
            drained: Arc::new(Notify::new()),
        }
    }

    /// Submit a trigger. Must be called from within a tokio runtime — the
    /// driving task is spawned onto it.
    pub fn submit(&self, op: SealOperation) -> Submit {
        {
            let mut targets = lock(&self.targets);
            if let Some(state) = targets.get_mut(&op.target) {
                // Busy: latest trigger wins the single pending slot.
                state.pending = Some(op);
                return Submit::Coalesced;
            }
            targets.insert(op.target.clone(), TargetState { pending: None });
        }
        self.spawn_driver(op);
        Submit::Started
    }

    /// Resolve once every in-flight operation (and its pending follow-up)
    /// has completed.
    pub async fn wait_idle(&self) {
        loop {
            // Register interest before checking, so a drain between the
            // check and the await can't be missed.
            let drained = self.drained.notified();
            if lock(&self.targets).is_empty() {
                return;
            }
            drained.await;
        }
    }

    /// One driving task per busy path: run, then either re-enter with the
    /// pending trigger or retire. The map lock is only ever held for the
    /// state transition itself — never across the subprocess await — so a
    /// later-triggered run can never complete before an earlier one for
    /// the same path.
    fn spawn_driver(&self, first: SealOperation) {
        let exec = Arc::clone(&self.exec);
        let reporter = Arc::clone(&self.reporter);
        let targets = Arc::clone(&self.targets);
        let drained = Arc::clone(&self.drained);

        tokio::spawn(async move {
            let mut op = first;
            loop {
                let key = op.target.clone();
                reporter.started(&op);
                let report = exec.execute(op).await;
                reporter.finished(&report);

                let (next, now_idle) = {
                    let mut map = lock(&targets);
                    match map.get_mut(&key).and_then(|s| s.pending.take()) {
                        Some(pending) => (Some(pending), false),
                        None => {
                            map.remove(&key);
                            (None, map.is_empty())
                        }
                    }
                };

                if now_idle {
                    drained.notify_waiters();
                }
                match next {
                    Some(pending) => op = pending,
                    None => break,
                }
            }
        });
    }
}

/// Poisoning only happens if a holder panicked mid-transition; the map is
/// still structurally sound, so recover the guard.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ─── Tests ────────────────────────────────────────────────────────────────
