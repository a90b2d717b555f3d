//! Error types for wheel construction and curve export.

use thiserror::Error;

/// Result type for wheel operations.
pub type WheelResult<T> = Result<T, WheelError>;

/// Errors that can occur while building scenes or exporting traced curves.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WheelError {
    /// The radius is zero, negative or not a finite number.
    #[error("wheel radius must be positive and finite, got {radius}")]
    InvalidGeometry {
        /// The rejected radius.
        radius: f64,
    },

    /// Writing an exported curve failed.
    #[error("failed to write exported curve: {0}")]
    Io(#[from] std::io::Error),
}

impl WheelError {
    /// Checks that `radius` can describe a wheel.
    pub(crate) fn check_radius(radius: f64) -> WheelResult<f64> {
        if radius.is_finite() && radius > 0.0 {
            Ok(radius)
        } else {
            Err(WheelError::InvalidGeometry { radius })
        }
    }
}
