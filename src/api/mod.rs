//! REST API for the generation mix and charging window.
//!
//! Provides two endpoints under `/api/v1/energy`:
//! - `GET /mix` returns daily mix summaries for today and the following days
//! - `POST /optimal-charging` returns the cleanest window for `numberOfHours`

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::service::EnergyService;

pub use types::{ChargingRequest, DailyMixRecord, ErrorResponse, FuelMetric, OptimalWindowRecord};

/// Application state shared across all request handlers.
///
/// The service is read-only; response caching lives inside its source.
pub struct AppState {
    pub service: EnergyService,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve, without CORS.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/energy/mix", get(handlers::get_generation_mix))
        .route("/api/v1/energy/optimal-charging", post(handlers::post_optimal_charging))
        .with_state(state)
}

/// CORS layer admitting a single browser origin.
///
/// Returns `None` for an empty origin or one that is not a valid header value.
pub fn cors_layer(allowed_origin: &str) -> Option<CorsLayer> {
    if allowed_origin.is_empty() {
        return None;
    }
    let origin = match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => origin,
        Err(e) => {
            warn!(allowed_origin, error = %e, "Ignoring invalid CORS origin");
            return None;
        }
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Binds to the given address and serves the API.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
/// * `allowed_origin` - Browser origin for CORS; empty disables CORS
///
/// # Errors
///
/// Returns the I/O error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr, allowed_origin: &str) -> std::io::Result<()> {
    let mut app = router(state);
    if let Some(cors) = cors_layer(allowed_origin) {
        app = app.layer(cors);
    }
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
