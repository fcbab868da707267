//! Map OSM tags to a donation category.
//!
//! Precedence: `recycling_type=centre` wins, then the clothes/shoes pair.
//! Features accepting neither are dropped.

use crate::feature::{Category, ClassifiedFeature, RawFeature};
use tracing::trace;

const RECYCLING_TYPE: &str = "recycling_type";
const CLOTHES: &str = "recycling:clothes";
const SHOES: &str = "recycling:shoes";
const OPENING_HOURS: &str = "opening_hours";

/// Classify one feature. `None` means it does not belong to the domain.
#[must_use]
pub fn classify(raw: &RawFeature) -> Option<ClassifiedFeature> {
    let Some(category) = category_of(raw) else {
        trace!(feature = %raw.id, "Dropping feature that takes neither clothes nor shoes");
        return None;
    };

    Some(ClassifiedFeature {
        id: raw.id,
        location: raw.location,
        category,
        opening_hours: raw.tag(OPENING_HOURS).map(String::from),
        name: raw.tag("name").map(String::from),
        operator: raw.tag("operator").map(String::from),
    })
}

/// Classify a batch, preserving order and dropping what does not classify
#[must_use]
pub fn classify_all(raw: &[RawFeature]) -> Vec<ClassifiedFeature> {
    raw.iter().filter_map(classify).collect()
}

fn category_of(raw: &RawFeature) -> Option<Category> {
    if raw.tag(RECYCLING_TYPE) == Some("centre") {
        return Some(Category::Center);
    }

    let clothes = raw.tag(CLOTHES) == Some("yes");
    let shoes = raw.tag(SHOES) == Some("yes");

    match (clothes, shoes) {
        (true, true) => Some(Category::ClothesAndShoes),
        (true, false) => Some(Category::Clothes),
        (false, true) => Some(Category::Shoes),
        (false, false) => None,
    }
}
