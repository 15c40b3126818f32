//! Nearby service-center search: registered centers plus provider results,
//! reconciled by the [`Matcher`].

use std::sync::Arc;

use crate::centers::ReconciledResult;
use crate::error::{NearbyError, PlaceSearchError};
use crate::geo::Coordinates;
use crate::matcher::Matcher;
use crate::services::{CenterDirectory, PlaceQuery, PlaceSearch};

/// Largest radius the provider accepts.
pub const MAX_RADIUS_M: u32 = 50_000;

/// Three provider pages of twenty.
pub const MAX_RESULTS: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub origin: Coordinates,
    pub search_query: Option<String>,
    pub filter_registered: bool,
    pub radius_m: u32,
    pub max_results: usize,
}

impl NearbyQuery {
    /// Brings `radius_m` into `1..=MAX_RADIUS_M` and `max_results` into
    /// `1..=MAX_RESULTS`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            radius_m: self.radius_m.clamp(1, MAX_RADIUS_M),
            max_results: self.max_results.clamp(1, MAX_RESULTS),
            ..self
        }
    }
}

#[derive(Debug)]
pub struct NearbyOutcome {
    pub results: Vec<ReconciledResult>,
    /// Set when the provider failed and the results are registered-only.
    pub provider_error: Option<PlaceSearchError>,
}

pub struct NearbySearch {
    centers: Arc<dyn CenterDirectory>,
    places: Arc<dyn PlaceSearch>,
    matcher: Matcher,
}

impl NearbySearch {
    #[must_use]
    pub fn new(
        centers: Arc<dyn CenterDirectory>,
        places: Arc<dyn PlaceSearch>,
        matcher: Matcher,
    ) -> Self {
        Self {
            centers,
            places,
            matcher,
        }
    }

    /// Runs one nearby search.
    ///
    /// A provider failure does not fail the call: candidates are treated as
    /// empty and the error is returned alongside the registered-only results.
    ///
    /// # Errors
    ///
    /// Returns [`NearbyError::RegisteredCenters`] if the registered centers
    /// cannot be loaded.
    pub async fn search(&self, query: &NearbyQuery) -> Result<NearbyOutcome, NearbyError> {
        let registered = self
            .centers
            .registered_centers()
            .await
            .map_err(NearbyError::RegisteredCenters)?;

        let place_query = PlaceQuery {
            origin: query.origin,
            text: query
                .search_query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(ToOwned::to_owned),
            radius_m: query.radius_m,
            max_results: query.max_results,
        };

        let (candidates, provider_error) = match self.places.search(&place_query).await {
            Ok(candidates) => (candidates, None),
            Err(e) => {
                tracing::warn!(
                    status = e.code(),
                    error = %e,
                    "nearby: place search failed; returning registered centers only"
                );
                (Vec::new(), Some(e))
            }
        };

        let results = self.matcher.reconcile(
            &registered,
            &candidates,
            query.origin,
            query.filter_registered,
        );

        tracing::info!(
            registered = registered.len(),
            candidates = candidates.len(),
            results = results.len(),
            mode = %self.matcher.mode(),
            "nearby: reconciled"
        );

        Ok(NearbyOutcome {
            results,
            provider_error,
        })
    }
}
