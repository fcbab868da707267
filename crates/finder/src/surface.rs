//! The map widget seam and the marker registry.
//!
//! The finder never renders anything itself. It drives a [`MapSurface`] and
//! keeps its own [`MarkerRegistry`] mapping each feature id to the feature
//! data and the handle the surface gave back for its marker.

use crate::feature::{ClassifiedFeature, FeatureId, RankedFeature};
use dropoff_geo::Coordinate;
use serde::Serialize;
use std::collections::HashMap;

/// Where the current search is anchored
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchContext {
    /// Reference point
    pub center: Coordinate,
    /// Query radius
    pub radius_meters: f64,
}

impl SearchContext {
    /// New search context
    #[must_use]
    pub fn new(center: Coordinate, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
        }
    }

    /// Radius in kilometers
    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.radius_meters / 1000.0
    }
}

/// Side effects the finder needs from an interactive map
pub trait MapSurface {
    /// Handle for a rendered feature marker
    type Marker;

    /// Center the view
    fn focus(&mut self, center: Coordinate, zoom: u8);

    /// Replace the reference marker and the search-radius circle
    fn show_reference(&mut self, search: &SearchContext);

    /// Draw a marker for a feature
    fn add_marker(&mut self, feature: &ClassifiedFeature) -> Self::Marker;

    /// Remove a marker
    fn remove_marker(&mut self, marker: Self::Marker);

    /// Unhighlight `off`, then highlight `on`, as a single visual update
    fn highlight(&mut self, off: Option<&Self::Marker>, on: Option<&Self::Marker>);

    /// Fill the detail panel, or reset it to the prompt with `None`
    fn show_detail(&mut self, feature: Option<&ClassifiedFeature>);

    /// Fill the nearest-features panel
    fn show_nearest(&mut self, nearest: &[RankedFeature]);
}

/// A feature and its on-screen marker
#[derive(Debug)]
pub struct MarkerEntry<M> {
    /// Feature data
    pub feature: ClassifiedFeature,
    /// Surface handle
    pub marker: M,
}

/// Explicit feature-id → (feature, marker) mapping
#[derive(Debug)]
pub struct MarkerRegistry<M> {
    entries: HashMap<FeatureId, MarkerEntry<M>>,
}

impl<M> Default for MarkerRegistry<M> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<M> MarkerRegistry<M> {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a feature
    #[must_use]
    pub fn get(&self, id: &FeatureId) -> Option<&MarkerEntry<M>> {
        self.entries.get(id)
    }

    /// Whether a feature is currently on the map
    #[must_use]
    pub fn contains(&self, id: &FeatureId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of markers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No markers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every marker from the surface and draw `features` instead
    pub fn replace<S>(&mut self, surface: &mut S, features: &[ClassifiedFeature])
    where
        S: MapSurface<Marker = M>,
    {
        for (_, entry) in self.entries.drain() {
            surface.remove_marker(entry.marker);
        }

        for feature in features {
            let marker = surface.add_marker(feature);
            self.entries.insert(
                feature.id,
                MarkerEntry {
                    feature: feature.clone(),
                    marker,
                },
            );
        }
    }
}
