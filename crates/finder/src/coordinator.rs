//! Ties location, geodata, ranking, and selection to one map view.
//!
//! The coordinator is single-threaded: state lives in a `RefCell` that is
//! never borrowed across an `.await`. Each location change takes a fresh
//! generation number, and a query response is only applied if its
//! generation is still the latest, so the last update always wins.

use crate::classify::classify_all;
use crate::directions::directions_url;
use crate::error::{FinderError, Result};
use crate::feature::{dedupe, FeatureId, RankedFeature};
use crate::locate::{DevicePosition, IpPosition, LocationResolver};
use crate::selection::{SelectionController, SelectionState};
use crate::source::FeatureSource;
use crate::surface::{MapSurface, MarkerRegistry, SearchContext};
use dropoff_core::config::{ConfigSchema, SearchConfig};
use dropoff_geo::{rank_nearest, within_radius, Coordinate};
use dropoff_telemetry::{metrics, Timer};
use std::cell::{Cell, Ref, RefCell};
use tracing::{debug, instrument, warn};

/// Outcome of a location change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// New features drawn
    Applied {
        /// Markers on the map
        features: usize,
        /// Entries in the nearest panel
        nearest: usize,
    },
    /// The query failed; markers and the nearest panel were kept
    Retained,
    /// A newer location change arrived first; this response was discarded
    Superseded,
}

struct ViewState<S: MapSurface> {
    surface: S,
    search: Option<SearchContext>,
    markers: MarkerRegistry<S::Marker>,
    nearest: Vec<RankedFeature>,
    selection: SelectionController,
    drop_pin_armed: bool,
}

/// Drives a [`MapSurface`] from location changes and user input
pub struct MapViewCoordinator<G, S: MapSurface> {
    source: G,
    settings: SearchConfig,
    directions_base: String,
    state: RefCell<ViewState<S>>,
    generation: Cell<u64>,
}

impl<G: FeatureSource, S: MapSurface> MapViewCoordinator<G, S> {
    /// New coordinator with nothing on the map yet
    pub fn new(source: G, surface: S, settings: SearchConfig, directions_base: impl Into<String>) -> Self {
        Self {
            source,
            settings,
            directions_base: directions_base.into(),
            state: RefCell::new(ViewState {
                surface,
                search: None,
                markers: MarkerRegistry::new(),
                nearest: Vec::new(),
                selection: SelectionController::new(),
                drop_pin_armed: false,
            }),
            generation: Cell::new(0),
        }
    }

    /// New coordinator from a validated configuration
    pub fn from_config(source: G, surface: S, config: &ConfigSchema) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            source,
            surface,
            config.search.clone(),
            config.endpoints.directions_url.clone(),
        ))
    }

    /// Move the reference point and refresh everything that depends on it
    ///
    /// An invalid coordinate is rejected before anything changes. A failed
    /// query is not an error: the reference marker moves but the previous
    /// features stay on screen.
    #[instrument(skip(self), fields(center = %coordinate))]
    pub async fn on_location_change(&self, coordinate: Coordinate) -> Result<Refresh> {
        let center = coordinate.validate().map_err(|e| {
            warn!(error = %e, "Ignoring location change");
            FinderError::from(e)
        })?;

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let search = SearchContext::new(center, self.settings.radius_meters);
        {
            let mut state = self.state.borrow_mut();
            state.search = Some(search);
            state.surface.focus(center, self.settings.zoom);
            state.surface.show_reference(&search);
        }

        let timer = Timer::start("geo_query");
        let outcome = self.source.query(center, search.radius_meters).await;
        timer.stop();

        if generation != self.generation.get() {
            debug!(generation, latest = self.generation.get(), "Discarding superseded response");
            metrics().increment("refresh.superseded");
            return Ok(Refresh::Superseded);
        }

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, code = %e.code(), "Feature query failed, keeping previous results");
                metrics().increment("refresh.retained");
                return Ok(Refresh::Retained);
            }
        };

        let features = classify_all(&dedupe(raw));
        let mut nearest = rank_nearest(&center, &features, self.settings.top_k);
        if self.settings.clip_to_radius {
            nearest = within_radius(nearest, search.radius_km());
        }

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.markers.replace(&mut state.surface, &features);
        state.nearest = nearest;
        state.surface.show_nearest(&state.nearest);
        state.selection.features_replaced(&mut state.surface);

        let refresh = Refresh::Applied {
            features: state.markers.len(),
            nearest: state.nearest.len(),
        };
        debug!(?refresh, "Map refreshed");
        metrics().increment("refresh.applied");
        Ok(refresh)
    }

    /// Resolve the user's position and search around it
    pub async fn locate_me<D, I>(&self, resolver: &LocationResolver<D, I>) -> Result<Refresh>
    where
        D: DevicePosition,
        I: IpPosition,
    {
        let resolution = resolver.resolve_traced().await;
        debug!(tier = %resolution.tier, coordinate = %resolution.coordinate, "Located user");
        self.on_location_change(resolution.coordinate).await
    }

    /// Arm or disarm drop-pin mode, returning the new state
    pub fn toggle_drop_pin(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.drop_pin_armed = !state.drop_pin_armed;
        state.drop_pin_armed
    }

    /// A click on the map background
    ///
    /// With drop-pin armed the click becomes the new reference point and the
    /// mode disarms. Otherwise it clears the selection and returns `None`.
    pub async fn on_map_click(&self, coordinate: Coordinate) -> Result<Option<Refresh>> {
        let armed = {
            let mut state = self.state.borrow_mut();
            std::mem::replace(&mut state.drop_pin_armed, false)
        };

        if armed {
            self.on_location_change(coordinate).await.map(Some)
        } else {
            self.clear_selection();
            Ok(None)
        }
    }

    /// Select a feature on the map
    pub fn select(&self, id: FeatureId) -> Result<()> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.selection.select(id, &state.markers, &mut state.surface)
    }

    /// Deselect whatever is selected
    pub fn clear_selection(&self) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.selection.clear(&state.markers, &mut state.surface);
    }

    /// Directions link from the reference point to a feature
    pub fn directions_to(&self, id: FeatureId) -> Result<String> {
        let state = self.state.borrow();
        let entry = state.markers.get(&id).ok_or(FinderError::UnknownFeature(id))?;
        Ok(directions_url(
            &self.directions_base,
            state.search.map(|s| s.center),
            entry.feature.location,
        ))
    }

    /// Nearest features, closest first
    pub fn nearest(&self) -> Ref<'_, [RankedFeature]> {
        Ref::map(self.state.borrow(), |s| s.nearest.as_slice())
    }

    /// Current search anchor, if any location has been accepted
    pub fn search(&self) -> Option<SearchContext> {
        self.state.borrow().search
    }

    /// Current selection
    pub fn selection(&self) -> SelectionState {
        self.state.borrow().selection.state()
    }

    /// Features on the map
    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    /// Whether the next map click drops the pin
    pub fn drop_pin_armed(&self) -> bool {
        self.state.borrow().drop_pin_armed
    }

    /// The map surface
    pub fn surface(&self) -> Ref<'_, S> {
        Ref::map(self.state.borrow(), |s| &s.surface)
    }
}
