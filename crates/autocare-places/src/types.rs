//! Google Places response types.
//!
//! Nearby search reports the short `vicinity` address while text search
//! reports `formatted_address`; both shapes share [`PlaceResult`].

use autocare_core::{Coordinates, LocationRecord};
use serde::Deserialize;

/// One page of a nearby or text search.
#[derive(Debug, Deserialize)]
pub struct PlacesPage {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl PlaceResult {
    /// Converts to a [`LocationRecord`]; places without geometry are dropped.
    #[must_use]
    pub fn into_record(self) -> Option<LocationRecord> {
        let geometry = self.geometry?;
        let address = self
            .vicinity
            .or(self.formatted_address)
            .unwrap_or_default();
        Some(LocationRecord {
            place_id: self.place_id,
            name: self.name,
            address,
            location: Coordinates::new(geometry.location.lat, geometry.location.lng),
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_result_uses_vicinity() {
        let raw = serde_json::json!({
            "place_id": "abc",
            "name": "Quick Lube",
            "vicinity": "5 Elm St, Springfield",
            "geometry": { "location": { "lat": 1.5, "lng": 2.5 } },
            "rating": 4.2,
            "user_ratings_total": 31
        });
        let place: PlaceResult = serde_json::from_value(raw).expect("parse");
        let record = place.into_record().expect("record");
        assert_eq!(record.address, "5 Elm St, Springfield");
        assert_eq!(record.location, Coordinates::new(1.5, 2.5));
        assert_eq!(record.user_ratings_total, Some(31));
    }

    #[test]
    fn text_result_uses_formatted_address() {
        let raw = serde_json::json!({
            "place_id": "def",
            "name": "Brake Masters",
            "formatted_address": "9 Oak Ave, Springfield, USA",
            "geometry": { "location": { "lat": 0.0, "lng": 0.0 } }
        });
        let place: PlaceResult = serde_json::from_value(raw).expect("parse");
        let record = place.into_record().expect("record");
        assert_eq!(record.address, "9 Oak Ave, Springfield, USA");
        assert_eq!(record.rating, None);
    }

    #[test]
    fn result_without_geometry_is_dropped() {
        let raw = serde_json::json!({ "place_id": "ghi", "name": "Nowhere Garage" });
        let place: PlaceResult = serde_json::from_value(raw).expect("parse");
        assert!(place.into_record().is_none());
    }
}
