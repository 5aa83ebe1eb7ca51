use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SealAgentError {
    #[error("seal tool entry point not found: {}", .0.display())]
    ToolMissing(PathBuf),

    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("empty command line")]
    EmptyCommand,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
