//! Feature types: raw backend records, classified features, ranked features.

use dropoff_api_client::endpoints::{ElementKind, OverpassElement};
use dropoff_geo::{Coordinate, Located, Ranked};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::debug;

/// Placeholder shown when a feature has no `opening_hours` tag
pub const NO_OPENING_HOURS: &str = "Not available";

/// Identity of an OSM element. Node and way ids overlap, so the kind is part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FeatureId {
    /// Element type
    pub kind: ElementKind,
    /// OSM id
    pub id: i64,
}

impl FeatureId {
    /// Id of a node
    #[must_use]
    pub fn node(id: i64) -> Self {
        Self { kind: ElementKind::Node, id }
    }

    /// Id of a way
    #[must_use]
    pub fn way(id: i64) -> Self {
        Self { kind: ElementKind::Way, id }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
        };
        write!(f, "{kind}/{}", self.id)
    }
}

/// A feature as the backend returned it, with a validated position
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    /// Element identity
    pub id: FeatureId,
    /// Node position, or the backend-supplied centre of a way
    pub location: Coordinate,
    /// OSM tags, unvalidated
    pub tags: BTreeMap<String, String>,
}

impl RawFeature {
    /// Convert a wire element, skipping ones without a valid position
    #[must_use]
    pub fn from_element(element: OverpassElement) -> Option<Self> {
        let id = FeatureId {
            kind: element.kind,
            id: element.id,
        };
        let Some(location) = element.position().filter(Coordinate::is_valid) else {
            debug!(feature = %id, "Skipping element without a usable position");
            return None;
        };
        Some(Self {
            id,
            location,
            tags: element.tags,
        })
    }

    /// Value of a tag
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Drop repeated ids, keeping the first occurrence and the input order
#[must_use]
pub fn dedupe(features: Vec<RawFeature>) -> Vec<RawFeature> {
    let mut seen = HashSet::with_capacity(features.len());
    features.into_iter().filter(|f| seen.insert(f.id)).collect()
}

/// What a receptacle accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Clothes container
    Clothes,
    /// Shoes container
    Shoes,
    /// Container taking both clothes and shoes
    ClothesAndShoes,
    /// Staffed recycling/donation centre
    Center,
}

/// Marker colour per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerIcon {
    /// Clothes, or clothes and shoes
    Green,
    /// Shoes only
    Blue,
    /// Centres
    Orange,
}

impl Category {
    /// Popup title
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Clothes => "Clothes Donation Container",
            Category::Shoes => "Shoes Donation Container",
            Category::ClothesAndShoes => "Clothes and Shoes Donation Container",
            Category::Center => "Donation Center",
        }
    }

    /// Marker colour
    #[must_use]
    pub fn icon(self) -> MarkerIcon {
        match self {
            Category::Clothes | Category::ClothesAndShoes => MarkerIcon::Green,
            Category::Shoes => MarkerIcon::Blue,
            Category::Center => MarkerIcon::Orange,
        }
    }
}

/// A feature that belongs to the application's domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedFeature {
    /// Element identity
    pub id: FeatureId,
    /// Position used for ranking and the marker
    pub location: Coordinate,
    /// What the receptacle accepts
    pub category: Category,
    /// `opening_hours` verbatim
    pub opening_hours: Option<String>,
    /// `name` tag
    pub name: Option<String>,
    /// `operator` tag
    pub operator: Option<String>,
}

impl ClassifiedFeature {
    /// Opening hours, or the placeholder
    #[must_use]
    pub fn opening_hours_display(&self) -> &str {
        self.opening_hours.as_deref().unwrap_or(NO_OPENING_HOURS)
    }

    /// Name if tagged, otherwise the category label
    #[must_use]
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(self.category.label())
    }
}

impl Located for ClassifiedFeature {
    fn location(&self) -> Coordinate {
        self.location
    }
}

/// A classified feature with its distance from the reference point
pub type RankedFeature = Ranked<ClassifiedFeature>;
