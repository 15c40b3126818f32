use autocare_core::ReminderRunSummary;
use axum::{body::Bytes, extract::State, Extension, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRemindersRequest {
    #[serde(default)]
    test_mode: bool,
    test_date: Option<String>,
}

/// Runs the reminder batch on demand. An empty body runs for today at the
/// configured offset and sends for real.
pub(super) async fn process_reminders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ReminderRunSummary>, ApiError> {
    let request: ProcessRemindersRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ProcessRemindersRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::validation(req_id.0.clone(), format!("invalid request body: {e}"))
        })?
    };

    let reference = match request.test_date.as_deref() {
        Some(raw) => parse_test_date(raw, &state).ok_or_else(|| {
            ApiError::validation(
                req_id.0.clone(),
                format!("testDate must be YYYY-MM-DD or an RFC 3339 timestamp, got '{raw}'"),
            )
        })?,
        None => Utc::now().with_timezone(&state.utc_offset).date_naive(),
    };

    tracing::info!(
        %reference,
        dry_run = request.test_mode,
        "process-reminders: run requested"
    );

    let summary = state
        .reminders
        .process(reference, request.test_mode)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "process-reminders: run failed");
            ApiError::internal(req_id.0.clone(), e.to_string())
        })?;

    Ok(Json(summary))
}

fn parse_test_date(raw: &str, state: &AppState) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&state.utc_offset).date_naive())
    })
}
