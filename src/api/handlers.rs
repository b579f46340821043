//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use super::AppState;
use super::types::{ChargingRequest, DailyMixRecord, ErrorResponse, OptimalWindowRecord};
use crate::error::EnergyError;

const BAD_REQUEST_MESSAGE: &str = "Invalid input. Please check your entered values and try again.";
const UPSTREAM_MESSAGE: &str = "Service temporarily unavailable. Please try again later.";
const INTERNAL_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Returns the daily generation mix for today and the following days.
///
/// `GET /api/v1/energy/mix` → 200 + `Vec<DailyMixRecord>` JSON
/// upstream failure → 503 + `ErrorResponse`
pub async fn get_generation_mix(State(state): State<Arc<AppState>>) -> Result<Json<Vec<DailyMixRecord>>, EnergyError> {
    let days = state.service.generation_mix().await?;
    Ok(Json(days.iter().map(DailyMixRecord::from).collect()))
}

/// Returns the cleanest charging window of the requested length.
///
/// `POST /api/v1/energy/optimal-charging` with `{"numberOfHours": n}`
/// → 200 + `OptimalWindowRecord` JSON
/// `n` outside 1..=6 or malformed body → 400 + `ErrorResponse`
pub async fn post_optimal_charging(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChargingRequest>, JsonRejection>,
) -> Result<Json<OptimalWindowRecord>, EnergyError> {
    let Json(request) = body.map_err(|rejection| EnergyError::InvalidRequest(rejection.body_text()))?;
    let hours = u32::try_from(request.number_of_hours).map_err(|_| {
        EnergyError::InvalidRequest(format!(
            "number of hours must be between 1 and 6, got {}",
            request.number_of_hours
        ))
    })?;

    let window = state.service.optimal_window(hours).await?;
    Ok(Json(OptimalWindowRecord::from(&window)))
}

impl EnergyError {
    /// HTTP status, category and client-facing message for this error.
    fn status_parts(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request", BAD_REQUEST_MESSAGE),
            Self::UpstreamUnavailable(_) | Self::InsufficientData { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "External Service Error",
                UPSTREAM_MESSAGE,
            ),
            Self::NoWindowFound => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                INTERNAL_MESSAGE,
            ),
        }
    }
}

impl IntoResponse for EnergyError {
    fn into_response(self) -> Response {
        let (status, category, message) = self.status_parts();
        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %self, "Rejected request");
        } else {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        let body = ErrorResponse::new(status.as_u16(), category, message);
        (status, Json(body)).into_response()
    }
}
