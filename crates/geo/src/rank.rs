//! Nearest-first ranking with optional parallelism.
//!
//! Distances are computed for every item (in parallel with the `parallel`
//! feature), then sorted with a stable sort so items at equal distance keep
//! their input order.

use crate::{haversine_distance, Coordinate};
use serde::Serialize;

/// Anything with a position that can be ranked.
pub trait Located {
    /// Position of the item.
    fn location(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn location(&self) -> Coordinate {
        *self
    }
}

/// An item paired with its distance from the reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    /// The ranked item
    pub item: T,
    /// Great-circle distance in kilometers
    pub distance_km: f64,
}

/// Rank `items` by distance from `reference` and keep the `k` closest.
///
/// # Example
/// ```
/// use dropoff_geo::{rank_nearest, Coordinate};
///
/// let home = Coordinate::new(48.1486, 17.1077);
/// let points = [Coordinate::new(48.20, 17.20), Coordinate::new(48.15, 17.11)];
///
/// let nearest = rank_nearest(&home, &points, 1);
/// assert_eq!(nearest.len(), 1);
/// assert_eq!(nearest[0].item, points[1]);
/// ```
pub fn rank_nearest<T>(reference: &Coordinate, items: &[T], k: usize) -> Vec<Ranked<T>>
where
    T: Located + Clone + Send + Sync,
{
    let mut ranked = distances(reference, items);

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);

    ranked
}

/// Keep ranked entries no farther than `radius_km`.
pub fn within_radius<T>(ranked: Vec<Ranked<T>>, radius_km: f64) -> Vec<Ranked<T>> {
    ranked
        .into_iter()
        .filter(|r| r.distance_km <= radius_km)
        .collect()
}

fn distances<T>(reference: &Coordinate, items: &[T]) -> Vec<Ranked<T>>
where
    T: Located + Clone + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .map(|item| measure(reference, item))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(|item| measure(reference, item)).collect()
    }
}

#[inline]
fn measure<T: Located + Clone>(reference: &Coordinate, item: &T) -> Ranked<T> {
    Ranked {
        distance_km: haversine_distance(reference, &item.location()),
        item: item.clone(),
    }
}
