//! IP geolocation endpoint

use crate::client::DropoffClient;
use crate::error::{ApiError, ApiResult};
use dropoff_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// IP geolocation API interface
#[derive(Clone)]
pub struct IpLookupApi {
    client: DropoffClient,
}

impl IpLookupApi {
    /// Create a new IP lookup interface
    pub(crate) fn new(client: DropoffClient) -> Self {
        Self { client }
    }

    /// Fetch the raw lookup record
    ///
    /// GET {ip_lookup_url}
    pub async fn lookup(&self) -> ApiResult<IpLocation> {
        let url = self.client.config().ip_lookup_url.clone();
        let location: IpLocation = self.client.get_url(&url).await?;

        if location.error {
            return Err(ApiError::api_response(
                200,
                location.reason.unwrap_or_else(|| "lookup refused".to_string()),
            ));
        }
        Ok(location)
    }

    /// Approximate position of the caller
    ///
    /// Range validation is left to the caller.
    pub async fn locate(&self) -> ApiResult<Coordinate> {
        self.lookup().await?.coordinate()
    }
}

/// Response of an ipapi-style lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpLocation {
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// City name, when known
    pub city: Option<String>,
    /// Country name, when known
    pub country_name: Option<String>,
    /// Set by the service when it refuses to answer (rate limit, reserved IP)
    #[serde(default)]
    pub error: bool,
    /// Reason accompanying `error`
    pub reason: Option<String>,
}

impl IpLocation {
    /// Both coordinates, or the first missing field
    pub fn coordinate(&self) -> ApiResult<Coordinate> {
        let latitude = self.latitude.ok_or(ApiError::MissingField("latitude"))?;
        let longitude = self.longitude.ok_or(ApiError::MissingField("longitude"))?;
        Ok(Coordinate::new(latitude, longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_location_deserialize() {
        let json = r#"{
            "ip": "203.0.113.7",
            "city": "New York",
            "country_name": "United States",
            "latitude": 40.7,
            "longitude": -74.0
        }"#;

        let location: IpLocation = serde_json::from_str(json).unwrap();
        assert_eq!(location.city.as_deref(), Some("New York"));
        assert_eq!(location.coordinate().unwrap(), Coordinate::new(40.7, -74.0));
    }

    #[test]
    fn test_missing_longitude() {
        let location = IpLocation {
            latitude: Some(40.7),
            ..IpLocation::default()
        };
        assert!(matches!(
            location.coordinate(),
            Err(ApiError::MissingField("longitude"))
        ));
    }

    #[test]
    fn test_error_payload_deserialize() {
        let json = r#"{"error": true, "reason": "RateLimited"}"#;
        let location: IpLocation = serde_json::from_str(json).unwrap();
        assert!(location.error);
        assert_eq!(location.reason.as_deref(), Some("RateLimited"));
    }
}
