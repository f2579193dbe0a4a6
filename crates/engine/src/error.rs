//! Engine error types.

use thiserror::Error;

/// Transform engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source bytes could not be interpreted as an image. Fatal for the
    /// request; never retried.
    #[error("failed to decode source image: {0}")]
    Decode(image::ImageError),

    #[error("failed to encode output image: {0}")]
    Encode(image::ImageError),

    /// A mode-specific parameter was absent despite validation. Reaching
    /// this is a programming error in the caller.
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),
}

/// Result type for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
