//! Subprocess execution with bounded capture and a hard timeout.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error::SealAgentError;
use crate::types::ExecutionResult;
use crate::Result;

/// Per-stream capture cap. A misbehaving tool can write forever; everything
/// past the cap is read and discarded so the child never blocks on a full
/// pipe, but memory stays bounded.
pub const MAX_CAPTURE_BYTES: usize = 256 * 1024;

/// Run `argv` with `cwd` as working directory.
///
/// Stdout and stderr are drained concurrently into capped buffers. The
/// child is raced against `timeout`; on expiry it is killed and the result
/// carries `timed_out: true` instead of hanging indefinitely.
///
/// Spawn failure (interpreter not on PATH, not executable) returns
/// [`SealAgentError::Spawn`] for the classifier.
pub async fn run(argv: &[OsString], cwd: &Path, timeout: Duration) -> Result<ExecutionResult> {
    let (program, args) = argv.split_first().ok_or(SealAgentError::EmptyCommand)?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| SealAgentError::Spawn {
        program: program.to_string_lossy().into_owned(),
        source,
    })?;

    let stdout_task = child
        .stdout
        .take()
        .map(|out| tokio::spawn(drain_capped(out, MAX_CAPTURE_BYTES)));
    let stderr_task = child
        .stderr
        .take()
        .map(|err| tokio::spawn(drain_capped(err, MAX_CAPTURE_BYTES)));

    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => Some(status?),
        Err(_elapsed) => {
            // Killing closes the pipes, so the drain tasks finish too.
            let _ = child.kill().await;
            None
        }
    };

    let stdout = collect(stdout_task).await;
    let stderr = collect(stderr_task).await;

    Ok(ExecutionResult {
        exit_code: status.and_then(|s| s.code()),
        stdout,
        stderr,
        timed_out: status.is_none(),
    })
}

async fn collect(task: Option<tokio::task::JoinHandle<Vec<u8>>>) -> String {
    let bytes = match task {
        Some(handle) => handle.await.unwrap_or_default(),
        None => Vec::new(),
    };
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Read a stream to EOF, keeping at most `cap` bytes.
async fn drain_capped(mut stream: impl AsyncRead + Unpin, cap: usize) -> Vec<u8> {
    let mut chunk = [0u8; 8192];
    let mut out = Vec::new();
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if out.len() < cap {
                    let take = n.min(cap - out.len());
                    out.extend_from_slice(&chunk[..take]);
                }
                // Past the cap: keep reading, drop the bytes.
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<OsString> {
        vec![
            OsString::from("sh"),
            OsString::from("-c"),
            OsString::from(script),
        ]
    }

    fn cwd() -> std::path::PathBuf {
        std::env::temp_dir()
    }

    #[tokio::test]
    async fn captures_stdout_and_stderr_separately() {
        let result = run(&sh("echo out; echo err >&2"), &cwd(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(result.exit_code, Some(0));
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "out");
        assert_eq!(result.stderr.trim(), "err");
        assert!(!result.timed_out);
    }

    #[tokio::test]
    async fn nonzero_exit_code_is_reported() {
        let result = run(&sh("exit 3"), &cwd(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(result.exit_code, Some(3));
        assert!(!result.success());
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let argv = vec![OsString::from("sleep"), OsString::from("5")];
        let result = run(&argv, &cwd(), Duration::from_millis(100)).await.unwrap();
        assert!(result.timed_out);
        assert_eq!(result.exit_code, None);
        assert!(!result.success());
    }

    #[tokio::test]
    async fn spawn_failure_surfaces_as_spawn_error() {
        let argv = vec![OsString::from("definitely-not-a-real-binary-7f3a")];
        let err = run(&argv, &cwd(), Duration::from_secs(1)).await.unwrap_err();
        match err {
            SealAgentError::Spawn { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Spawn, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn runaway_output_is_capped() {
        // ~1 MiB of output; capture must stop at the cap while the child
        // still runs to completion.
        let result = run(
            &sh("head -c 1048576 /dev/zero | tr '\\0' 'x'"),
            &cwd(),
            Duration::from_secs(10),
        )
        .await
        .unwrap();
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout.len(), MAX_CAPTURE_BYTES);
    }

    #[tokio::test]
    async fn cwd_is_the_child_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = run(&sh("pwd"), dir.path(), Duration::from_secs(5))
            .await
            .unwrap();
        // Canonicalize both sides: the tempdir may sit behind a symlink
        // (macOS /tmp).
        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(reported, expected);
    }
}
