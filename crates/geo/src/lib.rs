//! Geospatial primitives for the dropoff finder.
//!
//! This crate provides:
//! - Validated WGS84 coordinates
//! - Haversine distance calculations
//! - Nearest-first ranking with optional parallelism
//!
//! # Example
//!
//! ```
//! use dropoff_geo::{haversine_distance, Coordinate};
//!
//! let bratislava = Coordinate::new(48.1486, 17.1077);
//! let vienna = Coordinate::new(48.2082, 16.3738);
//!
//! let distance_km = haversine_distance(&bratislava, &vienna);
//! assert!((distance_km - 55.0).abs() < 2.0);
//! ```

mod error;
mod haversine;
pub mod rank;

pub use error::{GeoError, Result};
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use rank::{rank_nearest, within_radius, Located, Ranked};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// No validation happens here; use [`Coordinate::validate`] before
    /// handing a coordinate from outside the process to anything else.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if both components are finite and in range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns the coordinate itself if valid, `InvalidCoordinate` otherwise.
    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Exactly (0, 0). Location providers report this when they have no fix.
    #[inline]
    pub fn is_null_island(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
