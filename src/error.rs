use crate::config::ConfigError;
use crate::settings::{TransformError, ValidationError};
use thiserror::Error;

/// Top-level error type for setkit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("settings transformer failed: {0}")]
    Transform(#[source] TransformError),

    #[error("settings validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("application context has no settings")]
    MissingConfig,
}
