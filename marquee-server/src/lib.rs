//! HTTP surface of the Marquee movie catalog.
//!
//! The crate wires the catalog core to axum: [`routes`] declares the
//! endpoint table, [`handlers`] adapts wire payloads to the core services,
//! [`errors`] maps domain failures onto HTTP statuses, and [`infra`] holds
//! configuration, shared state, and the rate-limit middleware.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::http::HeaderValue;
use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::infra::config::Config;
use crate::infra::middleware::rate_limit::enforce_rate_limit;

/// Build the full router: API routes behind the rate-limit gate, CORS,
/// and request tracing.
///
/// The caller attaches connection info when serving over TCP so the gate
/// can key on client addresses.
pub fn create_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config);

    Router::new()
        .merge(routes::create_api_router())
        .layer(from_fn_with_state(state.clone(), enforce_rate_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
