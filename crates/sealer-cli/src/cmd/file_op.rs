use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use seal_agent::{OperationKind, SealOperation, SealRunner};
use sealer_core::{discovery, Config, ToolContext};

use crate::output;

/// Shared driver for `lock` / `check` / `remove`: validate the target,
/// run the single operation, surface the outcome.
pub fn run(root: &Path, kind: OperationKind, file: &Path, json: bool) -> anyhow::Result<()> {
    discovery::ensure_sealable(file)?;
    // Absolute path so the owning project root can be found from the
    // target itself, independent of the invocation cwd.
    let file = std::fs::canonicalize(file)
        .with_context(|| format!("failed to resolve {}", file.display()))?;

    let config = Config::load(root).context("failed to load .sealer.yaml")?;
    let ctx = Arc::new(ToolContext::new(&config, root));
    let runner = SealRunner::new(ctx, root.to_path_buf(), config.timeout());

    let op = SealOperation::new(kind, &file);
    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(runner.seal(&op));

    let success = report.outcome.is_success();
    if json {
        output::print_json(&serde_json::json!({
            "target": file,
            "kind": kind.as_str(),
            "success": success,
            "message": report.message(),
        }))?;
        if !success {
            bail!("{kind} failed");
        }
        return Ok(());
    }

    if success {
        println!("{}: {}", file.display(), report.message());
        Ok(())
    } else {
        bail!("{}: {}", file.display(), report.message());
    }
}
