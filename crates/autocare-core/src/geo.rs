//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance from `self` to `other` in kilometers.
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(self, other)
    }
}

/// Haversine distance between two points in kilometers.
///
/// `from` is treated as the origin; the result is symmetric regardless.
#[must_use]
pub fn haversine_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = Coordinates::new(40.7128, -74.0060);
        assert!(haversine_km(&p, &p).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(40.7128, -74.0060);
        let b = Coordinates::new(34.0522, -118.2437);
        assert!((haversine_km(&a, &b) - haversine_km(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn new_york_to_los_angeles() {
        let nyc = Coordinates::new(40.7128, -74.0060);
        let la = Coordinates::new(34.0522, -118.2437);
        // ~3936 km great-circle
        assert!((nyc.distance_km(&la) - 3936.0).abs() < 10.0);
    }

    #[test]
    fn short_hop_is_below_match_threshold() {
        // ~0.05 km north
        let a = Coordinates::new(51.5000, -0.1200);
        let b = Coordinates::new(51.50045, -0.1200);
        let d = haversine_km(&a, &b);
        assert!(d > 0.04 && d < 0.06, "got {d}");
    }
}
