use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use seal_agent::{init_project, OperationOpts, Reporter, SealRunner};
use sealer_core::{Config, ToolContext};

use crate::output::{self, ConsoleReporter};

/// Initialize the project, then seal every discovered source file,
/// reporting aggregate counts. Partial failure is reported, never rolled
/// back — each file's seal is an independent unit of work.
pub fn run(
    root: &Path,
    key_file: Option<PathBuf>,
    upload_token: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load .sealer.yaml")?;
    let ctx = Arc::new(ToolContext::new(&config, root));
    let runner = Arc::new(SealRunner::new(ctx, root.to_path_buf(), config.timeout()));

    let opts = OperationOpts {
        // The flag beats the config default.
        key_file: key_file.or_else(|| config.key_file.clone()),
        upload_token,
    };

    if !json {
        println!("Initializing seal project in: {}", root.display());
    }
    let reporter: Arc<dyn Reporter> = if json {
        Arc::new(seal_agent::LogReporter)
    } else {
        Arc::new(ConsoleReporter)
    };

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(init_project(
        runner,
        root,
        opts,
        &config.exclude,
        reporter,
    ));

    if json {
        output::print_json(&serde_json::json!({
            "initialized": summary.initialized,
            "already_initialized": summary.already_initialized,
            "sealed": summary.sealed,
            "failed": summary.failed,
        }))?;
    } else {
        println!(
            "sealed {} file(s), {} failed",
            summary.sealed, summary.failed
        );
    }

    if !summary.initialized {
        bail!("project initialization failed");
    }
    if summary.failed > 0 {
        bail!("{} file(s) failed to seal", summary.failed);
    }
    Ok(())
}
