//! Find clothing and shoe donation points near the user
//!
//! - **Location**: device fix, then IP lookup, then a configured default
//! - **Features**: Overpass area query, classification by OSM tags
//! - **Ranking**: nearest-first by great-circle distance
//! - **Map view**: markers, selection, and a nearest panel driven through [`MapSurface`]
//!
//! # Example
//!
//! ```rust,no_run
//! use dropoff_api_client::{ClientConfig, DropoffClient};
//! use dropoff_core::config::Config;
//! use dropoff_finder::{LocationResolver, MapViewCoordinator, NoDevice};
//! # use dropoff_finder::{ClassifiedFeature, RankedFeature, SearchContext};
//! # use dropoff_geo::Coordinate;
//! # struct Headless;
//! # impl dropoff_finder::MapSurface for Headless {
//! #     type Marker = ();
//! #     fn focus(&mut self, _: Coordinate, _: u8) {}
//! #     fn show_reference(&mut self, _: &SearchContext) {}
//! #     fn add_marker(&mut self, _: &ClassifiedFeature) {}
//! #     fn remove_marker(&mut self, _: ()) {}
//! #     fn highlight(&mut self, _: Option<&()>, _: Option<&()>) {}
//! #     fn show_detail(&mut self, _: Option<&ClassifiedFeature>) {}
//! #     fn show_nearest(&mut self, _: &[RankedFeature]) {}
//! # }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! let client = DropoffClient::with_config(ClientConfig::from_env(&config.schema.endpoints))?;
//!
//! let resolver = LocationResolver::new(NoDevice, client.ip_lookup(), &config.schema.location)?;
//! let map = MapViewCoordinator::from_config(client.overpass(), Headless, &config.schema)?;
//!
//! map.locate_me(&resolver).await?;
//! for ranked in map.nearest().iter() {
//!     println!("{} ({:.2} km)", ranked.item.title(), ranked.distance_km);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod coordinator;
pub mod directions;
pub mod error;
pub mod feature;
pub mod locate;
pub mod selection;
pub mod source;
pub mod surface;

#[cfg(test)]
mod testing;

pub use classify::{classify, classify_all};
pub use coordinator::{MapViewCoordinator, Refresh};
pub use directions::directions_url;
pub use error::{FinderError, Result};
pub use feature::{Category, ClassifiedFeature, FeatureId, MarkerIcon, RankedFeature, RawFeature};
pub use locate::{DevicePosition, IpPosition, LocationResolver, LocationTier, NoDevice, PositionRequest, Resolution};
pub use selection::{SelectionController, SelectionState};
pub use source::FeatureSource;
pub use surface::{MapSurface, MarkerEntry, MarkerRegistry, SearchContext};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::coordinator::{MapViewCoordinator, Refresh};
    pub use crate::error::{FinderError, Result};
    pub use crate::feature::{Category, ClassifiedFeature, FeatureId, RankedFeature};
    pub use crate::locate::{LocationResolver, LocationTier, NoDevice};
    pub use crate::selection::SelectionState;
    pub use crate::surface::{MapSurface, SearchContext};
}
