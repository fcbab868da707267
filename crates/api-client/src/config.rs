//! Configuration for the API client
//!
//! Built from the `[endpoints]` section of the shared configuration, with
//! environment variables taking precedence.

use crate::error::{ApiError, ApiResult};
use dropoff_core::config::EndpointsConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Overpass interpreter endpoint
    pub overpass_url: String,
    /// IP geolocation endpoint
    pub ip_lookup_url: String,
    /// User-Agent header value
    pub user_agent: String,
    /// Request timeout
    #[serde(with = "secs")]
    pub timeout: Duration,
}

mod secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_endpoints(&EndpointsConfig::default())
    }
}

impl ClientConfig {
    /// Build from the `[endpoints]` configuration section
    #[must_use]
    pub fn from_endpoints(endpoints: &EndpointsConfig) -> Self {
        Self {
            overpass_url: endpoints.overpass_url.clone(),
            ip_lookup_url: endpoints.ip_lookup_url.clone(),
            user_agent: endpoints.user_agent.clone(),
            timeout: Duration::from_secs(endpoints.timeout_secs),
        }
    }

    /// Build from the `[endpoints]` section, then apply environment overrides
    ///
    /// Reads the following environment variables:
    /// - `DROPOFF_OVERPASS_URL`: Overpass interpreter endpoint
    /// - `DROPOFF_IP_LOOKUP_URL`: IP geolocation endpoint
    /// - `DROPOFF_TIMEOUT_SECS`: Request timeout in seconds
    #[must_use]
    pub fn from_env(endpoints: &EndpointsConfig) -> Self {
        let mut config = Self::from_endpoints(endpoints);

        if let Ok(url) = env::var("DROPOFF_OVERPASS_URL") {
            config.overpass_url = url;
        }
        if let Ok(url) = env::var("DROPOFF_IP_LOOKUP_URL") {
            config.ip_lookup_url = url;
        }
        if let Some(timeout) = env::var("DROPOFF_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
        {
            config.timeout = timeout;
        }

        config
    }

    /// Builder-style method to set the Overpass URL
    #[must_use]
    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    /// Builder-style method to set the IP lookup URL
    #[must_use]
    pub fn with_ip_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.ip_lookup_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for url in [&self.overpass_url, &self.ip_lookup_url] {
            if url.is_empty() {
                return Err(ApiError::config("endpoint URL cannot be empty"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::InvalidUrl(url.clone()));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.overpass_url.contains("overpass-api.de"));
        assert!(config.ip_lookup_url.starts_with("https://"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_endpoints() {
        let endpoints = EndpointsConfig {
            timeout_secs: 5,
            ..EndpointsConfig::default()
        };
        let config = ClientConfig::from_endpoints(&endpoints);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_overpass_url("http://localhost:8080/api/interpreter")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.overpass_url, "http://localhost:8080/api/interpreter");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());

        let empty = ClientConfig::default().with_overpass_url("");
        assert!(empty.validate().is_err());

        let bad_scheme = ClientConfig::default().with_ip_lookup_url("ipapi.co/json");
        assert!(matches!(bad_scheme.validate(), Err(ApiError::InvalidUrl(_))));

        let zero = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(zero.validate().is_err());
    }
}
