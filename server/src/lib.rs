use axum::{routing::get, Json, Router};
use portero::{AllowList, ClientIpResolver, Gatekeeper};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

pub mod config;
pub mod error;
pub mod middleware;

pub use crate::config::Config;

/// Build the application router.
///
/// The gatekeeper layer sits outside CORS and route dispatch, so a denied
/// request never reaches either.
pub fn app(config: Config) -> Router {
    let gatekeeper = Arc::new(Gatekeeper::new(
        ClientIpResolver::new(config.forwarded_header, config.trusted_hops),
        AllowList::new(config.allow_list),
    ));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .layer((
            TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()),
            // Graceful shutdown will wait for outstanding requests to complete. Add a timeout so
            // requests don't hang forever.
            TimeoutLayer::new(config.request_timeout),
            axum::middleware::from_fn_with_state(gatekeeper, middleware::ip_gatekeeper),
            CorsLayer::permissive(),
        ))
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn health() -> &'static str {
    "ok"
}
