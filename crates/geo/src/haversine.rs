//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// # Example
/// ```
/// use dropoff_geo::{haversine_distance, Coordinate};
///
/// let bratislava = Coordinate::new(48.1486, 17.1077);
/// let budapest = Coordinate::new(47.4979, 19.0402);
///
/// let distance = haversine_distance(&bratislava, &budapest);
/// assert!((distance - 161.0).abs() < 5.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BRATISLAVA: Coordinate = Coordinate { latitude: 48.1486, longitude: 17.1077 };
    const VIENNA: Coordinate = Coordinate { latitude: 48.2082, longitude: 16.3738 };
    const NEW_YORK: Coordinate = Coordinate { latitude: 40.7128, longitude: -74.0060 };
    const TOKYO: Coordinate = Coordinate { latitude: 35.6762, longitude: 139.6503 };

    #[test]
    fn test_bratislava_to_vienna() {
        let distance = haversine_distance(&BRATISLAVA, &VIENNA);
        assert!((distance - 55.0).abs() < 2.0, "Bratislava-Vienna: {distance}");
    }

    #[test]
    fn test_new_york_to_tokyo() {
        let distance = haversine_distance(&NEW_YORK, &TOKYO);
        // Expected: ~10,838 km
        assert!((distance - 10838.0).abs() < 50.0, "NYC-Tokyo: {distance}");
    }

    #[test]
    fn test_short_hop_inside_city() {
        let container = Coordinate::new(48.15, 17.11);
        let distance = haversine_distance(&BRATISLAVA, &container);
        assert!(distance > 0.1 && distance < 0.5, "short hop: {distance}");
    }

    #[test]
    fn test_antipodes_do_not_produce_nan() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let distance = haversine_distance(&a, &b);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1.0);
    }

    #[test]
    fn test_meters_conversion() {
        let km = haversine_distance(&BRATISLAVA, &VIENNA);
        let meters = haversine_distance_meters(&BRATISLAVA, &VIENNA);
        assert!((meters - km * 1000.0).abs() < 1.0);
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in coordinate(), b in coordinate()) {
            let d1 = haversine_distance(&a, &b);
            let d2 = haversine_distance(&b, &a);
            prop_assert!((d1 - d2).abs() < 1e-9);
        }

        #[test]
        fn prop_identity_is_zero(a in coordinate()) {
            prop_assert!(haversine_distance(&a, &a).abs() < 1e-9);
        }

        #[test]
        fn prop_bounded_by_half_circumference(a in coordinate(), b in coordinate()) {
            let d = haversine_distance(&a, &b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
