//! Error types for the finder

use crate::feature::FeatureId;
use dropoff_api_client::ApiError;
use dropoff_core::ErrorCode;
use dropoff_geo::GeoError;
use thiserror::Error;

/// Result type alias for finder operations
pub type Result<T> = std::result::Result<T, FinderError>;

/// Finder errors
#[derive(Error, Debug)]
pub enum FinderError {
    /// A location tier could not produce a coordinate
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Network or decoding failure while querying geodata
    #[error("Geodata query failed: {0}")]
    GeoQueryFailed(#[from] ApiError),

    /// Latitude/longitude out of range or not finite
    #[error(transparent)]
    InvalidCoordinate(#[from] GeoError),

    /// Feature id not present in the current feature set
    #[error("Unknown feature: {0}")]
    UnknownFeature(FeatureId),

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] dropoff_core::Error),
}

impl FinderError {
    /// Create a location-unavailable error
    pub fn location_unavailable(reason: impl Into<String>) -> Self {
        Self::LocationUnavailable(reason.into())
    }

    /// Shared error code for this error
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::LocationUnavailable(_) => ErrorCode::LocationUnavailable,
            Self::GeoQueryFailed(e) => match e.code() {
                ErrorCode::HttpStatus | ErrorCode::MalformedResponse | ErrorCode::Timeout => e.code(),
                _ => ErrorCode::GeoQueryFailed,
            },
            Self::InvalidCoordinate(e) => e.code(),
            Self::UnknownFeature(_) => ErrorCode::UnknownFeature,
            Self::Config(e) => e.code,
        }
    }
}
