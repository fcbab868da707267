//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Area query and ranking
    #[serde(default)]
    pub search: SearchConfig,

    /// Location fallback chain
    #[serde(default)]
    pub location: LocationConfig,

    /// External services
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

impl ConfigSchema {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.location.validate()?;
        self.endpoints.validate()
    }
}

/// Search area and ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius of the area query around the reference point
    #[serde(default = "default_radius_meters")]
    pub radius_meters: f64,

    /// Number of entries in the nearest panel
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Map zoom applied when the reference point changes
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Drop ranked features farther than `radius_meters`
    #[serde(default)]
    pub clip_to_radius: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_meters: default_radius_meters(),
            top_k: default_top_k(),
            zoom: default_zoom(),
            clip_to_radius: false,
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(Error::invalid_config(format!(
                "search.radius_meters must be positive, got {}",
                self.radius_meters
            )));
        }
        if self.top_k == 0 {
            return Err(Error::invalid_config("search.top_k must be at least 1"));
        }
        Ok(())
    }
}

fn default_radius_meters() -> f64 {
    20_000.0
}

fn default_top_k() -> usize {
    3
}

fn default_zoom() -> u8 {
    12
}

/// Location fallback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Bounded wait for the device fix before falling through
    #[serde(default = "default_device_timeout_ms")]
    pub device_timeout_ms: u64,

    /// Latitude used when every other tier fails
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,

    /// Longitude used when every other tier fails
    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            device_timeout_ms: default_device_timeout_ms(),
            fallback_latitude: default_fallback_latitude(),
            fallback_longitude: default_fallback_longitude(),
        }
    }
}

impl LocationConfig {
    fn validate(&self) -> Result<()> {
        if self.device_timeout_ms == 0 {
            return Err(Error::invalid_config("location.device_timeout_ms cannot be zero"));
        }
        let lat_ok = self.fallback_latitude.is_finite() && self.fallback_latitude.abs() <= 90.0;
        let lng_ok = self.fallback_longitude.is_finite() && self.fallback_longitude.abs() <= 180.0;
        if !lat_ok || !lng_ok {
            return Err(Error::invalid_config(format!(
                "location fallback ({}, {}) is not a valid coordinate",
                self.fallback_latitude, self.fallback_longitude
            )));
        }
        Ok(())
    }
}

fn default_device_timeout_ms() -> u64 {
    10_000
}

// Bratislava
fn default_fallback_latitude() -> f64 {
    48.1486
}

fn default_fallback_longitude() -> f64 {
    17.1077
}

/// External endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Overpass interpreter URL
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    /// IP geolocation URL returning `latitude`/`longitude`
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    /// Base of the directions link
    #[serde(default = "default_directions_url")]
    pub directions_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            overpass_url: default_overpass_url(),
            ip_lookup_url: default_ip_lookup_url(),
            directions_url: default_directions_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl EndpointsConfig {
    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("overpass_url", &self.overpass_url),
            ("ip_lookup_url", &self.ip_lookup_url),
            ("directions_url", &self.directions_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::invalid_config(format!(
                    "endpoints.{name} must start with http:// or https://"
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_config("endpoints.timeout_secs cannot be zero"));
        }
        Ok(())
    }
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_ip_lookup_url() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_directions_url() -> String {
    "https://www.google.com/maps/dir/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("dropoff/", env!("CARGO_PKG_VERSION")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(ConfigSchema::default().validate().is_ok());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let schema: ConfigSchema = toml::from_str("[search]\ntop_k = 5\n").unwrap();
        assert_eq!(schema.search.top_k, 5);
        assert_eq!(schema.search.radius_meters, 20_000.0);
        assert_eq!(schema.location.fallback_latitude, 48.1486);
    }

    #[test]
    fn test_rejects_zero_top_k() {
        let mut schema = ConfigSchema::default();
        schema.search.top_k = 0;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_fallback() {
        let mut schema = ConfigSchema::default();
        schema.location.fallback_latitude = 123.0;
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let mut schema = ConfigSchema::default();
        schema.endpoints.overpass_url = "ftp://example.org".to_string();
        assert!(schema.validate().is_err());
    }
}
