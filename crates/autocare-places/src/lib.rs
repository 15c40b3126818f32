//! Google Places (legacy web service) client used as the external
//! place-search provider for nearby service-center lookups.

mod client;
mod error;
mod types;

pub use client::{PlacesClient, DEFAULT_PAGE_DELAY, MAX_PAGES};
pub use error::PlacesError;
pub use types::{PlaceResult, PlacesPage};
