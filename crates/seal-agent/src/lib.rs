//! `seal-agent` — async driver for the external seal-tool subprocess.
//!
//! The seal tool (an interpreter-run script) owns all cryptography and
//! decorator placement; this crate owns getting it launched correctly and
//! reporting what happened.
//!
//! # Architecture
//!
//! ```text
//! SealOperation
//!     │
//!     ▼
//! Scheduler       ← per-path serialization + supersede coalescing
//!     │
//!     ▼
//! SealRunner      ← interpreter → argv → subprocess → outcome
//!     │
//!     ├── command::build_argv   (argument vector, never a shell string)
//!     ├── exec::run             (bounded capture, hard timeout)
//!     └── classify::classify    (outcome taxonomy + user messages)
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use seal_agent::{OperationKind, SealOperation, SealRunner};
//!
//! let runner = SealRunner::new(ctx, session_root, config.timeout());
//! let report = runner.seal(&SealOperation::new(OperationKind::Lock, file)).await;
//! println!("{}", report.message());
//! ```

pub mod classify;
pub mod command;
pub mod error;
pub mod exec;
pub mod report;
pub mod runner;
pub mod scheduler;
pub mod types;

pub use classify::Outcome;
pub use error::SealAgentError;
pub use report::{LogReporter, OperationReport, Reporter};
pub use runner::{init_project, InitSummary, SealRunner};
pub use scheduler::{ExecuteOp, Scheduler, Submit};
pub use types::{ExecutionResult, OperationKind, OperationOpts, SealOperation};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, SealAgentError>;
