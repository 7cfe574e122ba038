use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres, matching the routing provider's unit.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A map marker position in degrees, longitude first.
///
/// Waypoint identity is positional: index 0 in the caller's list is the
/// fixed start and end of every tour. Solvers never read coordinates;
/// they exist for the straight-line fallback matrix and for logs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lng: f64,
    pub lat: f64,
}

impl Waypoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Great-circle distance to `other` in metres, by the spherical law
    /// of cosines.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();
        let lat2 = other.lat.to_radians();
        let lng2 = other.lng.to_radians();

        let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lng1 - lng2).cos();
        // Rounding can push the cosine a hair outside [-1, 1]; acos would
        // return NaN there.
        cosine.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let point = Waypoint::new(-73.989, 40.733);
        assert_eq!(point.distance_to(&point), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Waypoint::new(-73.989, 40.733);
        let b = Waypoint::new(-73.935, 40.780);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let a = Waypoint::new(0.0, 0.0);
        let b = Waypoint::new(1.0, 0.0);
        let metres = a.distance_to(&b);
        // One degree of arc on the mean-radius sphere is ~111.2 km.
        assert!((metres - 111_195.0).abs() < 100.0, "got {metres}");
    }

    #[test]
    fn antipodes_do_not_produce_nan() {
        let a = Waypoint::new(0.0, 0.0);
        let b = Waypoint::new(180.0, 0.0);
        let metres = a.distance_to(&b);
        assert!(metres.is_finite());
        assert!((metres - std::f64::consts::PI * 6_371_000.0).abs() < 1.0);
    }
}
