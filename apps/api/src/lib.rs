//! # Venta API
//!
//! HTTP server for the Venta inventory and sales backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                 │
//! │                                                                     │
//! │  Client ──► HTTP (5000) ──► require_auth ──► Routes ──► venta-db   │
//! │                                  │                                  │
//! │                                  ▼                                  │
//! │                          Identity Service                           │
//! │                         (token verification)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `/` and `/api/health` are public; everything else requires a
//! verified bearer token and operates solely on the caller's own data.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use venta_db::Database;

use crate::auth::{require_auth, AuthVerifier};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub verifier: Arc<dyn AuthVerifier>,
}

/// Builds the full application router: public health endpoints, the
/// auth-guarded API surface, CORS, and request tracing.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Skipping unparseable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let protected = Router::new()
        .merge(routes::product::router())
        .merge(routes::customer::router())
        .merge(routes::sale::router())
        .merge(routes::report::router())
        .merge(routes::backup::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(routes::health::root))
        .route("/api/health", get(routes::health::health))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
