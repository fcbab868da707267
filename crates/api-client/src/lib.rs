//! HTTP client for the services the dropoff finder talks to
//!
//! - **Overpass**: area query for clothing/shoe recycling points and centres
//! - **IP geolocation**: approximate position when the device has no fix
//!
//! Every request carries an `X-Request-ID` and is traced. Nothing is retried
//! automatically; callers decide how to degrade.
//!
//! # Example
//!
//! ```rust,no_run
//! use dropoff_api_client::{ClientConfig, DropoffClient};
//! use dropoff_geo::Coordinate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DropoffClient::with_config(ClientConfig::default())?;
//!
//!     let here = client.ip_lookup().locate().await?;
//!     let elements = client.overpass().search(here, 20_000.0).await?;
//!     println!("{} recycling points near {here}", elements.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::DropoffClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::DropoffClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{
        ElementKind, IpLocation, IpLookupApi, OverpassApi, OverpassElement, OverpassResponse,
    };
    pub use crate::error::{ApiError, ApiResult};
}
