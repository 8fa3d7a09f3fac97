//! Error types shared by the simulation, codec and export layers

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias carrying [`CurtainError`].
pub type Result<T> = std::result::Result<T, CurtainError>;

/// Error type for curtain construction, encoding and export failures
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CurtainError {
    /// A vector-valued input had the wrong number of components
    #[error("{what} must have {expected} components (got {actual})")]
    Shape { what: &'static str, expected: usize, actual: usize },
    /// Mutually exclusive construction options were combined
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Filesystem failure during export, rename or delete
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// GIF encode or decode failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// `curtain.toml` could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CurtainError {
    pub(crate) fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::Shape { what, expected, actual }
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
