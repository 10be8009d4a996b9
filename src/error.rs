//! Error types.
//!
//! Every failure the crate reports is an invalid argument detected before any
//! pixel work starts. Blurring itself cannot fail.

use thiserror::Error;

/// Crate result alias.
pub type Result<T> = core::result::Result<T, BlurError>;

/// Top-level error returned by all fallible operations.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BlurError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// The argument that was rejected, and why.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidArgument {
    #[error("no source buffer supplied")]
    MissingSource,
    #[error("source buffer is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
    #[error("blur radius {radius} outside supported range {min}..={max}")]
    RadiusOutOfRange { radius: i64, min: u32, max: u32 },
    #[error("pixel data holds {actual} elements, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("scale factor {factor} must be finite and at least 1")]
    ScaleFactor { factor: f32 },
    #[error("capture region has zero area")]
    EmptyRegion,
}

impl BlurError {
    /// The rejected argument.
    pub fn reason(&self) -> InvalidArgument {
        match self {
            BlurError::InvalidArgument(r) => *r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_reason() {
        let err = BlurError::from(InvalidArgument::RadiusOutOfRange {
            radius: 0,
            min: 1,
            max: 253,
        });
        assert_eq!(
            err.to_string(),
            "invalid argument: blur radius 0 outside supported range 1..=253"
        );
    }

    #[test]
    fn test_reason_roundtrip() {
        let err: BlurError = InvalidArgument::EmptyRegion.into();
        assert_eq!(err.reason(), InvalidArgument::EmptyRegion);
    }
}
