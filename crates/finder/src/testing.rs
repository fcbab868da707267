//! Test doubles shared by the unit tests.

use crate::error::{FinderError, Result};
use crate::feature::{Category, ClassifiedFeature, FeatureId, RankedFeature, RawFeature};
use crate::source::FeatureSource;
use crate::surface::{MapSurface, SearchContext};
use dropoff_api_client::ApiError;
use dropoff_geo::Coordinate;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

pub(crate) fn classified(id: FeatureId, category: Category, lat: f64, lng: f64) -> ClassifiedFeature {
    ClassifiedFeature {
        id,
        location: Coordinate::new(lat, lng),
        category,
        opening_hours: None,
        name: None,
        operator: None,
    }
}

pub(crate) fn raw(id: FeatureId, lat: f64, lng: f64, tags: &[(&str, &str)]) -> RawFeature {
    RawFeature {
        id,
        location: Coordinate::new(lat, lng),
        tags: tags
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}

/// `MapSurface` that records what it was asked to draw
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    next_marker: usize,
    markers: HashMap<usize, ClassifiedFeature>,
    highlighted: BTreeSet<usize>,
    max_highlighted: usize,
    highlight_calls: usize,
    detail: Option<ClassifiedFeature>,
    nearest: Vec<FeatureId>,
    nearest_calls: usize,
    pub(crate) focus: Vec<(Coordinate, u8)>,
    pub(crate) references: Vec<SearchContext>,
}

impl RecordingSurface {
    pub(crate) fn live_markers(&self) -> usize {
        self.markers.len()
    }

    pub(crate) fn highlighted_features(&self) -> Vec<FeatureId> {
        self.highlighted
            .iter()
            .filter_map(|m| self.markers.get(m).map(|f| f.id))
            .collect()
    }

    pub(crate) fn max_simultaneous_highlights(&self) -> usize {
        self.max_highlighted
    }

    pub(crate) fn highlight_calls(&self) -> usize {
        self.highlight_calls
    }

    pub(crate) fn detail(&self) -> Option<FeatureId> {
        self.detail.as_ref().map(|f| f.id)
    }

    pub(crate) fn detail_feature(&self) -> Option<&ClassifiedFeature> {
        self.detail.as_ref()
    }

    pub(crate) fn nearest(&self) -> &[FeatureId] {
        &self.nearest
    }

    pub(crate) fn nearest_calls(&self) -> usize {
        self.nearest_calls
    }

    pub(crate) fn marker_ids(&self) -> BTreeSet<FeatureId> {
        self.markers.values().map(|f| f.id).collect()
    }
}

impl MapSurface for RecordingSurface {
    type Marker = usize;

    fn focus(&mut self, center: Coordinate, zoom: u8) {
        self.focus.push((center, zoom));
    }

    fn show_reference(&mut self, search: &SearchContext) {
        self.references.push(*search);
    }

    fn add_marker(&mut self, feature: &ClassifiedFeature) -> usize {
        self.next_marker += 1;
        self.markers.insert(self.next_marker, feature.clone());
        self.next_marker
    }

    fn remove_marker(&mut self, marker: usize) {
        assert!(self.markers.remove(&marker).is_some(), "removed unknown marker {marker}");
        self.highlighted.remove(&marker);
    }

    fn highlight(&mut self, off: Option<&usize>, on: Option<&usize>) {
        self.highlight_calls += 1;
        if let Some(m) = off {
            self.highlighted.remove(m);
        }
        if let Some(m) = on {
            assert!(self.markers.contains_key(m), "highlighted unknown marker {m}");
            self.highlighted.insert(*m);
        }
        self.max_highlighted = self.max_highlighted.max(self.highlighted.len());
    }

    fn show_detail(&mut self, feature: Option<&ClassifiedFeature>) {
        self.detail = feature.cloned();
    }

    fn show_nearest(&mut self, nearest: &[RankedFeature]) {
        self.nearest_calls += 1;
        self.nearest = nearest.iter().map(|r| r.item.id).collect();
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Features(Vec<RawFeature>),
    Fail,
}

/// `FeatureSource` answering from a script keyed by query center
#[derive(Debug, Default)]
pub(crate) struct StubSource {
    replies: Vec<(Coordinate, Duration, Reply)>,
    fallback: Option<Reply>,
    calls: Cell<usize>,
}

impl StubSource {
    /// Every query gets the same reply, immediately
    pub(crate) fn always(reply: Reply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::default()
        }
    }

    /// Reply to queries at `center` after `delay`
    pub(crate) fn at(mut self, center: Coordinate, delay: Duration, reply: Reply) -> Self {
        self.replies.push((center, delay, reply));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl FeatureSource for StubSource {
    async fn query(&self, center: Coordinate, _radius_meters: f64) -> Result<Vec<RawFeature>> {
        self.calls.set(self.calls.get() + 1);

        let scripted = self
            .replies
            .iter()
            .find(|(at, _, _)| *at == center)
            .map(|(_, delay, reply)| (*delay, reply.clone()));
        let (delay, reply) = match scripted {
            Some(found) => found,
            None => (Duration::ZERO, self.fallback.clone().unwrap_or(Reply::Fail)),
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Features(features) => Ok(features),
            Reply::Fail => Err(FinderError::GeoQueryFailed(ApiError::api_response(
                504,
                "gateway timeout",
            ))),
        }
    }
}
