//! Overpass API endpoint
//!
//! One POST per search. The Overpass QL body asks for nodes and ways tagged
//! `amenity=recycling` that accept clothes or shoes, inside a circle around
//! the reference point. Ways are returned with their backend-computed centre.

use crate::client::DropoffClient;
use crate::error::{ApiError, ApiResult};
use dropoff_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Server-side time limit requested in the query, in seconds
const QUERY_TIMEOUT_SECS: u32 = 25;

/// Prefix of the `remark` Overpass sends when it aborts a query
const RUNTIME_ERROR: &str = "runtime error";

/// Recycling tags the query filters on
const RECYCLING_TAGS: [&str; 2] = ["recycling:clothes", "recycling:shoes"];

/// Overpass API interface
#[derive(Clone)]
pub struct OverpassApi {
    client: DropoffClient,
}

impl OverpassApi {
    /// Create a new Overpass API interface
    pub(crate) fn new(client: DropoffClient) -> Self {
        Self { client }
    }

    /// Search for clothing/shoe recycling elements around `center`
    ///
    /// POST {overpass_url}
    pub async fn search(&self, center: Coordinate, radius_meters: f64) -> ApiResult<Vec<OverpassElement>> {
        let query = build_query(center, radius_meters);
        let url = self.client.config().overpass_url.clone();

        let response: OverpassResponse = self.client.post_text(&url, query).await?;
        if let Some(remark) = response.runtime_error() {
            warn!(center = %center, remark, "Overpass aborted the query");
            return Err(ApiError::Backend(remark.to_string()));
        }
        debug!(
            center = %center,
            radius_meters,
            elements = response.elements.len(),
            "Overpass search returned"
        );
        Ok(response.elements)
    }
}

/// Build the Overpass QL body for an area search
#[must_use]
pub fn build_query(center: Coordinate, radius_meters: f64) -> String {
    let around = format!(
        "(around:{radius_meters},{},{})",
        center.latitude, center.longitude
    );

    let mut query = format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n");
    for kind in ["node", "way"] {
        for tag in RECYCLING_TAGS {
            query.push_str(&format!(
                "  {kind}[\"amenity\"=\"recycling\"][\"{tag}\"=\"yes\"]{around};\n"
            ));
        }
    }
    query.push_str(");\nout center;\n");
    query
}

// ============================================================================
// Response Types
// ============================================================================

/// Top-level Overpass JSON response
///
/// `elements` is required: a body without it is not an answer to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements
    pub elements: Vec<OverpassElement>,
    /// Server diagnostics; `runtime error: ...` means the query was aborted
    /// and `elements` is incomplete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl OverpassResponse {
    /// The runtime error the server reported, if any
    #[must_use]
    pub fn runtime_error(&self) -> Option<&str> {
        self.remark
            .as_deref()
            .filter(|remark| remark.starts_with(RUNTIME_ERROR))
    }
}

/// OSM element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Point feature
    Node,
    /// Line or area feature
    Way,
    /// Relation; not requested, tolerated if a mirror returns one
    Relation,
}

/// Latitude/longitude pair as Overpass encodes it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
}

/// A single element from the `elements` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverpassElement {
    /// Element type
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// OSM id, unique per element type
    pub id: i64,
    /// Node latitude
    pub lat: Option<f64>,
    /// Node longitude
    pub lon: Option<f64>,
    /// Centre of a way, from `out center`
    pub center: Option<LatLon>,
    /// OSM tags
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl OverpassElement {
    /// Representative position: the node itself, or the way's centre
    #[must_use]
    pub fn position(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => self.center.map(|c| Coordinate::new(c.lat, c.lon)),
        }
    }
}
