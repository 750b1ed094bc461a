//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance to `other` in statute miles.
    pub fn distance_to(&self, other: &Location) -> f64 {
        distance(self, other)
    }
}

/// Great-circle distance in statute miles (spherical law of cosines).
///
/// The cosine term is clamped to [-1, 1]: for (near-)identical points rounding
/// can push it just past 1.0 and `acos` would return NaN. Identical points
/// short-circuit to exactly zero.
pub fn distance(a: &Location, b: &Location) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).abs().cos();
    let angle = cos_angle.clamp(-1.0, 1.0).acos();

    let nautical_miles = 60.0 * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::north_pole(90.0, 0.0)]
    #[case::south_pole(-90.0, 135.0)]
    #[case::antimeridian_east(12.5, 180.0)]
    #[case::antimeridian_west(-33.9, -180.0)]
    #[case::disneyland(33.817595, -117.922008)]
    #[case::origin(0.0, 0.0)]
    fn distance_to_self_is_zero(#[case] lat: f64, #[case] lon: f64) {
        let p = Location::new(lat, lon);
        let d = distance(&p, &p);
        assert!(!d.is_nan());
        assert_eq!(d, 0.0);
    }

    #[test]
    fn antimeridian_sides_are_the_same_point() {
        let east = Location::new(10.0, 180.0);
        let west = Location::new(10.0, -180.0);
        assert!(distance(&east, &west) < 1e-3);
    }

    #[test]
    fn one_degree_of_latitude_is_sixty_nautical_miles() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(1.0, 0.0);
        let expected = 60.0 * STATUTE_MILES_PER_NAUTICAL_MILE;
        assert!((distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn antipodes_are_half_the_circumference_apart() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(0.0, 180.0);
        let expected = 60.0 * 180.0 * STATUTE_MILES_PER_NAUTICAL_MILE;
        assert!((distance(&a, &b) - expected).abs() < 1e-6);
    }

    fn coordinate() -> impl Strategy<Value = Location> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Location::new(lat, lon))
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
            prop_assert_eq!(distance(&a, &b), distance(&b, &a));
        }

        #[test]
        fn distance_is_never_nan(a in coordinate(), b in coordinate()) {
            let d = distance(&a, &b);
            prop_assert!(d.is_finite());
            prop_assert!(d >= 0.0);
        }

        #[test]
        fn distance_to_self_is_always_zero(a in coordinate()) {
            prop_assert_eq!(distance(&a, &a), 0.0);
        }
    }
}
