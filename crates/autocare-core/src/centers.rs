//! Service-center records: registered (internal), candidate (external
//! place search), and the reconciled view returned to clients.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;

/// A place returned by the external place-search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub location: Coordinates,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
}

/// A service center registered with the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredCenter {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub location: Option<Coordinates>,
    /// Place id at the external provider, when the center has been linked.
    pub google_place_id: Option<String>,
    pub average_rating: Option<f64>,
}

/// Where a reconciled result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Google,
    Internal,
}

/// One entry of the merged, ranked nearby-search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledResult {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Option<Coordinates>,
    /// Kilometers from the query origin.
    pub distance: Option<f64>,
    pub is_registered: bool,
    pub registered_data: Option<RegisteredCenter>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub maps_url: Option<String>,
    pub source: ResultSource,
}

/// Deep link that opens a provider place in Google Maps.
#[must_use]
pub fn place_maps_url(place_id: &str) -> String {
    format!("https://www.google.com/maps/place/?q=place_id:{place_id}")
}

/// Deep link that opens a coordinate search in Google Maps.
#[must_use]
pub fn coordinates_maps_url(location: &Coordinates) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        location.lat, location.lng
    )
}
