//! Where features come from.

use crate::error::Result;
use crate::feature::RawFeature;
use dropoff_api_client::endpoints::OverpassApi;
use dropoff_geo::Coordinate;
use std::future::Future;
use tracing::debug;

/// Area query against the geodata backend
///
/// Implementations return failures as values; callers decide whether to keep
/// what they already have.
pub trait FeatureSource {
    /// Every candidate feature within `radius_meters` of `center`
    fn query(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> impl Future<Output = Result<Vec<RawFeature>>>;
}

impl<T: FeatureSource> FeatureSource for &T {
    fn query(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> impl Future<Output = Result<Vec<RawFeature>>> {
        (**self).query(center, radius_meters)
    }
}

impl FeatureSource for OverpassApi {
    async fn query(&self, center: Coordinate, radius_meters: f64) -> Result<Vec<RawFeature>> {
        let elements = self.search(center, radius_meters).await?;
        let total = elements.len();

        let features: Vec<RawFeature> = elements
            .into_iter()
            .filter_map(RawFeature::from_element)
            .collect();

        if features.len() < total {
            debug!(
                skipped = total - features.len(),
                "Dropped elements without a usable position"
            );
        }
        Ok(features)
    }
}
