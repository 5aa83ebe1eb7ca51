use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SealerError {
    #[error("not a sealable source file: {}", .0.display())]
    NotSealable(PathBuf),

    #[error("file not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SealerError>;
