//! Endpoint-specific API implementations
//!
//! | Module | Service | Description |
//! |--------|---------|-------------|
//! | `overpass` | Overpass API `interpreter` | Area query for textile recycling points |
//! | `ip_lookup` | ipapi-style JSON lookup | Approximate position from the caller's IP |

pub mod ip_lookup;
pub mod overpass;

pub use ip_lookup::{IpLocation, IpLookupApi};
pub use overpass::{ElementKind, LatLon, OverpassApi, OverpassElement, OverpassResponse};
