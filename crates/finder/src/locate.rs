//! Where the user is.
//!
//! Three tiers, tried in order: the device's own fix, an IP geolocation
//! lookup, then a configured default. Every tier failure is logged and
//! swallowed so that resolution always produces a coordinate.

use crate::error::{FinderError, Result};
use dropoff_api_client::endpoints::IpLookupApi;
use dropoff_core::config::LocationConfig;
use dropoff_geo::Coordinate;
use dropoff_telemetry::metrics;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Options passed to the device positioning API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    /// Ask for GPS-grade accuracy
    pub high_accuracy: bool,
    /// Oldest cached fix the device may return
    pub maximum_age: Duration,
    /// How long the device may take
    pub timeout: Duration,
}

impl PositionRequest {
    /// High accuracy, no cached fixes
    #[must_use]
    pub fn fresh(timeout: Duration) -> Self {
        Self {
            high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout,
        }
    }
}

/// Platform geolocation
pub trait DevicePosition {
    /// Current fix, or an error if permission was denied or no fix is available
    fn current_position(&self, request: PositionRequest) -> impl Future<Output = Result<Coordinate>>;
}

/// Approximate location from the public IP address
pub trait IpPosition {
    /// Coordinate reported by the lookup service
    fn ip_position(&self) -> impl Future<Output = Result<Coordinate>>;
}

/// A platform without geolocation support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevice;

impl DevicePosition for NoDevice {
    async fn current_position(&self, _request: PositionRequest) -> Result<Coordinate> {
        Err(FinderError::location_unavailable("geolocation is not supported"))
    }
}

impl IpPosition for IpLookupApi {
    async fn ip_position(&self) -> Result<Coordinate> {
        self.locate()
            .await
            .map_err(|e| FinderError::location_unavailable(format!("IP lookup failed: {e}")))
    }
}

/// Which tier produced a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LocationTier {
    /// Device fix
    Device,
    /// IP geolocation
    IpLookup,
    /// Configured default
    Fallback,
}

impl LocationTier {
    /// Short name used in logs and metrics
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LocationTier::Device => "device",
            LocationTier::IpLookup => "ip_lookup",
            LocationTier::Fallback => "fallback",
        }
    }

    fn metric(self) -> &'static str {
        match self {
            LocationTier::Device => "location.device",
            LocationTier::IpLookup => "location.ip_lookup",
            LocationTier::Fallback => "location.fallback",
        }
    }
}

impl fmt::Display for LocationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved coordinate and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// The coordinate
    pub coordinate: Coordinate,
    /// The tier that produced it
    pub tier: LocationTier,
}

/// Ordered location fallback chain
#[derive(Debug)]
pub struct LocationResolver<D, I> {
    device: D,
    ip: I,
    device_timeout: Duration,
    fallback: Coordinate,
}

impl<D: DevicePosition, I: IpPosition> LocationResolver<D, I> {
    /// Build a resolver. Fails if the configured fallback is not a valid coordinate.
    pub fn new(device: D, ip: I, config: &LocationConfig) -> Result<Self> {
        let fallback = Coordinate::new(config.fallback_latitude, config.fallback_longitude);
        if !fallback.is_valid() {
            return Err(FinderError::location_unavailable(format!(
                "fallback coordinate {fallback} is out of range"
            )));
        }

        Ok(Self {
            device,
            ip,
            device_timeout: Duration::from_millis(config.device_timeout_ms),
            fallback,
        })
    }

    /// Fallback coordinate
    #[must_use]
    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    /// Best available coordinate. Never fails.
    pub async fn resolve(&self) -> Coordinate {
        self.resolve_traced().await.coordinate
    }

    /// Best available coordinate and the tier that produced it
    pub async fn resolve_traced(&self) -> Resolution {
        let request = PositionRequest::fresh(self.device_timeout);
        let device = tokio::time::timeout(self.device_timeout, self.device.current_position(request)).await;
        let device = match device {
            Ok(fix) => fix,
            Err(_) => Err(FinderError::location_unavailable(format!(
                "device fix timed out after {}ms",
                self.device_timeout.as_millis()
            ))),
        };
        if let Some(resolution) = accept(LocationTier::Device, device) {
            return resolution;
        }

        if let Some(resolution) = accept(LocationTier::IpLookup, self.ip.ip_position().await) {
            return resolution;
        }

        info!(coordinate = %self.fallback, "Using default location");
        metrics().increment(LocationTier::Fallback.metric());
        Resolution {
            coordinate: self.fallback,
            tier: LocationTier::Fallback,
        }
    }
}

fn accept(tier: LocationTier, outcome: Result<Coordinate>) -> Option<Resolution> {
    let coordinate = match outcome {
        Ok(c) if c.is_valid() && !c.is_null_island() => c,
        Ok(c) => {
            warn!(tier = %tier, coordinate = %c, "Rejected unusable fix");
            return None;
        }
        Err(e) => {
            warn!(tier = %tier, error = %e, "Location tier failed");
            return None;
        }
    };

    debug!(tier = %tier, coordinate = %coordinate, "Location resolved");
    metrics().increment(tier.metric());
    Some(Resolution { coordinate, tier })
}
