//! Argument-vector construction for seal-tool invocations.
//!
//! Always an argument array handed straight to the OS, never a pre-joined
//! shell string — paths containing spaces, quotes, or other metacharacters
//! pass through as single arguments with no quoting logic anywhere.

use std::ffi::OsString;
use std::path::Path;

use crate::error::SealAgentError;
use crate::types::{OperationKind, SealOperation};
use crate::Result;

/// Build the argv for one operation: `[interpreter, tool_entry, subcommand, …]`.
///
/// Fails with [`SealAgentError::ToolMissing`] when the entry point is not a
/// file on disk — the one precondition this layer can check up front.
///
/// `lock`/`check`/`remove` append the target file as a single positional
/// argument. `init` appends no positional at all (the tool operates on the
/// cwd the executor sets); its options go through explicit flags.
pub fn build_argv(
    tool_entry: &Path,
    interpreter: &str,
    op: &SealOperation,
) -> Result<Vec<OsString>> {
    if !tool_entry.is_file() {
        return Err(SealAgentError::ToolMissing(tool_entry.to_path_buf()));
    }

    let mut argv: Vec<OsString> = vec![
        OsString::from(interpreter),
        tool_entry.as_os_str().to_owned(),
        OsString::from(op.kind.as_str()),
    ];

    match op.kind {
        OperationKind::Init => {
            if let Some(key_file) = &op.opts.key_file {
                argv.push(OsString::from("--key-file"));
                argv.push(key_file.as_os_str().to_owned());
            }
            if let Some(token) = &op.opts.upload_token {
                argv.push(OsString::from("--upload-token"));
                argv.push(OsString::from(token));
            }
        }
        OperationKind::Lock | OperationKind::Check | OperationKind::Remove => {
            argv.push(op.target.as_os_str().to_owned());
        }
    }

    Ok(argv)
}
