/// Error types for the relief pipeline
use thiserror::Error;

/// Result type for relief pipeline operations.
pub type Result<T> = std::result::Result<T, ReliefError>;

/// Errors that can occur while converting a height field into an STL solid.
///
/// All of these are deterministic given fixed inputs, so nothing in the
/// pipeline retries on failure.
#[derive(Debug, Error)]
pub enum ReliefError {
    /// Invalid conversion parameters (resolution, dimensions, solid name).
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Pixel buffer length does not match the declared dimensions.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Geometry that cannot form a valid solid.
    #[error("invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// The conversion was cancelled through its `CancelToken`.
    #[error("conversion cancelled")]
    Cancelled,

    /// Malformed ASCII STL text.
    #[error("failed to parse ASCII STL: {message}")]
    Parse { message: String },

    /// Failure writing the serialized document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReliefError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
