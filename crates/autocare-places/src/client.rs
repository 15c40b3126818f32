//! HTTP client for the Google Places nearby and text search endpoints.
//!
//! Both endpoints return at most 20 results per page and a
//! `next_page_token` for the following page. A token only becomes valid a
//! short while after it is issued, so follow-up pages are requested after
//! a fixed delay.

use std::time::Duration;

use async_trait::async_trait;
use autocare_core::{LocationRecord, PlaceQuery, PlaceSearch, PlaceSearchError};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::PlacesPage;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Upper bound on pages fetched for a single search.
pub const MAX_PAGES: usize = 3;

/// Wait before requesting a page by token.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// Place type used for plain nearby searches.
const NEARBY_PLACE_TYPE: &str = "car_repair";

/// Client for the Google Places web service.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    page_delay: Duration,
}

impl PlacesClient {
    /// Creates a new client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("autocare/0.1 (service-center-search)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            page_delay: DEFAULT_PAGE_DELAY,
        })
    }

    /// Overrides the wait before each follow-up page.
    #[must_use]
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Runs a nearby search (no text) or a location-biased text search and
    /// follows page tokens until `max_results` places, [`MAX_PAGES`] pages,
    /// or the last page.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] if any page reports a failure status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if a page does not match the expected shape.
    pub async fn search_places(
        &self,
        query: &PlaceQuery,
    ) -> Result<Vec<LocationRecord>, PlacesError> {
        let mut url = self.first_page_url(query)?;
        let mut records = Vec::new();

        for page_number in 1..=MAX_PAGES {
            let page = self.fetch_page(&url).await?;
            records.extend(
                page.results
                    .into_iter()
                    .filter_map(crate::types::PlaceResult::into_record),
            );

            if records.len() >= query.max_results {
                records.truncate(query.max_results);
                break;
            }

            let Some(token) = page.next_page_token.filter(|t| !t.is_empty()) else {
                break;
            };
            if page_number == MAX_PAGES {
                break;
            }

            tokio::time::sleep(self.page_delay).await;
            url = self.page_token_url(query, &token)?;
        }

        tracing::debug!(
            count = records.len(),
            text = query.text.as_deref().unwrap_or(""),
            "places search complete"
        );
        Ok(records)
    }

    fn first_page_url(&self, query: &PlaceQuery) -> Result<Url, PlacesError> {
        let location = format!("{},{}", query.origin.lat, query.origin.lng);
        let radius = query.radius_m.to_string();

        match query.text.as_deref() {
            Some(text) => self.build_url(
                "textsearch/json",
                &[("query", text), ("location", &location), ("radius", &radius)],
            ),
            None => self.build_url(
                "nearbysearch/json",
                &[
                    ("location", &location),
                    ("radius", &radius),
                    ("type", NEARBY_PLACE_TYPE),
                ],
            ),
        }
    }

    fn page_token_url(&self, query: &PlaceQuery, token: &str) -> Result<Url, PlacesError> {
        let endpoint = if query.text.is_some() {
            "textsearch/json"
        } else {
            "nearbysearch/json"
        };
        self.build_url(endpoint, &[("pagetoken", token)])
    }

    /// Builds the full request URL with percent-encoded query parameters,
    /// always appending the API key.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, parses the page and
    /// checks its `status` field.
    async fn fetch_page(&self, url: &Url) -> Result<PlacesPage, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let page: PlacesPage =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: url.path().to_owned(),
                source: e,
            })?;

        match page.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(page),
            _ => Err(PlacesError::Api {
                status: page.status,
                message: page.error_message,
            }),
        }
    }
}

#[async_trait]
impl PlaceSearch for PlacesClient {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<LocationRecord>, PlaceSearchError> {
        self.search_places(query).await.map_err(PlaceSearchError::from)
    }
}
