use std::path::{Component, Path};
use std::sync::Arc;

use anyhow::Context;
use notify::{EventKind, RecursiveMode, Watcher};
use seal_agent::{OperationKind, Reporter, Scheduler, SealOperation, SealRunner};
use sealer_core::{discovery, Config, ToolContext};

use crate::output::ConsoleReporter;

/// Watch the project tree and reseal source files as they change.
///
/// The editor-save analogue: every create/modify of a sealable file submits
/// a `lock` through the scheduler, so rapid save bursts coalesce into at
/// most one follow-up run per file. Runs until interrupted, then drains
/// in-flight operations before exiting.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load .sealer.yaml")?;
    let ctx = Arc::new(ToolContext::new(&config, root));
    let runner = Arc::new(SealRunner::new(
        ctx,
        root.to_path_buf(),
        config.timeout(),
    ));
    let excludes = config.exclude.clone();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let scheduler = Scheduler::new(runner, Arc::new(ConsoleReporter) as Arc<dyn Reporter>);

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
            let _ = tx.send(event);
        })
        .context("failed to create file watcher")?;
        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("failed to watch {}", root.display()))?;

        tracing::info!("watching {} — sealable files are resealed on save", root.display());

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        Ok(event) if is_save_event(&event.kind) => {
                            for path in event.paths {
                                if should_reseal(&path, &excludes) {
                                    scheduler.submit(SealOperation::new(OperationKind::Lock, path));
                                }
                            }
                        }
                        Ok(_) => {}
                        Err(e) => tracing::warn!("watch error: {e}"),
                    }
                }
            }
        }

        tracing::info!("draining in-flight seal operations");
        scheduler.wait_idle().await;
        Ok(())
    })
}

fn is_save_event(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

/// Sealable file outside every excluded directory.
fn should_reseal(path: &Path, extra_excludes: &[String]) -> bool {
    if !discovery::is_sealable(path) {
        return false;
    }
    !path.components().any(|c| match c {
        Component::Normal(name) => name
            .to_str()
            .is_some_and(|n| discovery::is_excluded_dir(n, extra_excludes)),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn only_sealable_files_are_resealed() {
        assert!(should_reseal(Path::new("/p/src/app.py"), &[]));
        assert!(!should_reseal(Path::new("/p/src/app.rs"), &[]));
        assert!(!should_reseal(Path::new("/p/notes.txt"), &[]));
    }

    #[test]
    fn excluded_directories_suppress_reseals() {
        assert!(!should_reseal(Path::new("/p/.venv/lib/site.py"), &[]));
        assert!(!should_reseal(
            Path::new("/p/a/node_modules/b/setup.py"),
            &[]
        ));
        assert!(!should_reseal(
            Path::new("/p/generated/gen.py"),
            &["generated".to_string()]
        ));
    }

    #[test]
    fn exclusion_matches_whole_names_only() {
        let p = PathBuf::from("/p/buildings/app.py");
        assert!(should_reseal(&p, &[]));
    }
}
