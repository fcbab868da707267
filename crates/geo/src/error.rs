//! Error types for the geo crate.

use dropoff_core::ErrorCode;
use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude/longitude not finite or out of range
    #[error("Invalid coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },
}

impl GeoError {
    /// Returns the shared error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GeoError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
        }
    }
}
