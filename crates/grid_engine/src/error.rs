use grid_core::ConfigError;
use thiserror::Error;

/// Setup failures. All of these surface from construction, never later.
#[derive(Debug, Error)]
pub enum GridError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("async grid requires a {0} fetch capability")]
    MissingCapability(&'static str),
    #[error("invalid url template {template:?}: {reason}")]
    InvalidTemplate { template: String, reason: String },
    #[error("failed to start grid engine: {0}")]
    Runtime(#[from] std::io::Error),
}
