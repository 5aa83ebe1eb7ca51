use seal_agent::{OperationReport, Reporter, SealOperation};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Reporter that writes progress and outcomes to the terminal. Success
/// lines go to stdout, failures to stderr.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn started(&self, op: &SealOperation) {
        println!("  {} {}", op.kind, op.target.display());
    }

    fn finished(&self, report: &OperationReport) {
        if report.outcome.is_success() {
            println!("  ok: {}", report.message());
        } else {
            eprintln!("  failed: {}: {}", report.target.display(), report.message());
        }
    }
}
