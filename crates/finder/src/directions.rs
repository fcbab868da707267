//! Turn-by-turn handoff to an external maps site.

use dropoff_geo::Coordinate;

/// `{base}/{from}/{to}`, or `{base}//{to}` when there is no starting point
#[must_use]
pub fn directions_url(base: &str, from: Option<Coordinate>, to: Coordinate) -> String {
    let base = base.trim_end_matches('/');
    match from {
        Some(from) => format!("{base}/{from}/{to}"),
        None => format!("{base}//{to}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.google.com/maps/dir/";

    #[test]
    fn test_with_origin() {
        let url = directions_url(
            BASE,
            Some(Coordinate::new(48.1486, 17.1077)),
            Coordinate::new(48.15, 17.11),
        );
        assert_eq!(url, "https://www.google.com/maps/dir/48.1486,17.1077/48.15,17.11");
    }

    #[test]
    fn test_without_origin() {
        let url = directions_url(BASE, None, Coordinate::new(48.2, 17.2));
        assert_eq!(url, "https://www.google.com/maps/dir//48.2,17.2");
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let url = directions_url("https://maps.example/dir", None, Coordinate::new(1.5, -2.5));
        assert_eq!(url, "https://maps.example/dir//1.5,-2.5");
    }
}
