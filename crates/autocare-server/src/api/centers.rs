use autocare_core::{Coordinates, NearbyQuery};
use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// Set when the place-search provider failed and only registered centers
/// were returned. Carries the provider status, e.g. `OVER_QUERY_LIMIT`.
pub const PLACE_SEARCH_STATUS_HEADER: &str = "x-place-search-status";

// Raw strings so malformed values get the JSON error envelope instead of
// the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NearbyParams {
    lat: Option<String>,
    lng: Option<String>,
    search_query: Option<String>,
    filter_registered: Option<String>,
    radius: Option<String>,
    max_results: Option<String>,
}

pub(super) async fn nearby_service_centers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearbyParams>,
) -> Result<Response, ApiError> {
    let query = parse_nearby_params(&params, &state).map_err(|message| {
        tracing::debug!(%message, "nearby: rejected request");
        ApiError::validation(req_id.0.clone(), message)
    })?;

    let outcome = state.nearby.search(&query).await.map_err(|e| {
        tracing::error!(error = %e, "nearby: search failed");
        ApiError::internal(req_id.0.clone(), "failed to load service centers")
    })?;

    let mut response = Json(outcome.results).into_response();

    if let Some(err) = outcome.provider_error {
        if let Ok(value) = HeaderValue::from_str(err.code()) {
            response
                .headers_mut()
                .insert(PLACE_SEARCH_STATUS_HEADER, value);
        }
    }

    Ok(response)
}

fn parse_nearby_params(params: &NearbyParams, state: &AppState) -> Result<NearbyQuery, String> {
    let lat = parse_coordinate(params.lat.as_deref(), "lat", 90.0)?;
    let lng = parse_coordinate(params.lng.as_deref(), "lng", 180.0)?;

    let radius_m = match params.radius.as_deref().map(str::trim) {
        None | Some("") => state.search_defaults.radius_m,
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| format!("radius must be a positive integer, got '{raw}'"))?,
    };

    let max_results = match params.max_results.as_deref().map(str::trim) {
        None | Some("") => state.search_defaults.max_results,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| format!("maxResults must be a positive integer, got '{raw}'"))?,
    };

    Ok(NearbyQuery {
        origin: Coordinates::new(lat, lng),
        search_query: params.search_query.clone(),
        filter_registered: params.filter_registered.as_deref() == Some("true"),
        radius_m,
        max_results,
    }
    .clamped())
}

fn parse_coordinate(raw: Option<&str>, name: &str, bound: f64) -> Result<f64, String> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| "Latitude and longitude are required".to_string())?;
    let value = raw
        .parse::<f64>()
        .map_err(|_| format!("{name} must be a number, got '{raw}'"))?;
    if !value.is_finite() || value.abs() > bound {
        return Err(format!("{name} must be between -{bound} and {bound}"));
    }
    Ok(value)
}
