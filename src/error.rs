use thiserror::Error;

use crate::config::ConfigError;
use crate::discover::ManifestError;
use crate::graph::resolve::UnresolvedError;

#[derive(Debug, Error)]
pub enum DeplinkError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("{0}")]
    Unresolved(#[from] UnresolvedError),
    #[error("command '{command}' failed: {reason}")]
    Execution { command: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DeplinkError>;
