//! alchemy-api library - Team Alchemy HTTP service
//!
//! Exposes the router, state and query layer for the binary and the
//! integration tests.

pub mod analysis;
pub mod api;
pub mod cli;
pub mod db;
pub mod error;
pub mod pagination;
pub mod worker;

pub use crate::error::{ApiError, ApiJson, ApiResult};

use alchemy_common::config::Settings;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::worker::JobQueue;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved configuration
    pub settings: Arc<Settings>,
    /// Background job queue
    pub jobs: JobQueue,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
    /// Cancelled when the server begins shutting down
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Create state and start the job worker (needs a tokio runtime)
    pub fn new(db: SqlitePool, settings: Settings) -> Self {
        let jobs = JobQueue::start(db.clone(), settings.max_recommendations);
        Self {
            db,
            settings: Arc::new(settings),
            jobs,
            startup_time: Utc::now(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Close long-lived responses such as SSE streams
    pub fn begin_shutdown(&self) {
        self.shutdown.cancel();
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build application router
///
/// Health and meta routes sit at the root; everything else is nested
/// under the configured API prefix behind the auth middleware, which
/// only checks mutating requests when `require_auth` is on.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::get;

    let api_routes = Router::new()
        .merge(api::assessment_routes())
        .merge(api::user_routes())
        .merge(api::team_routes())
        .merge(api::archetype_routes())
        .merge(api::psychology_routes())
        .merge(api::analysis_routes())
        .merge(api::intelligence_routes())
        .merge(api::job_routes())
        .route("/buildinfo", get(api::get_build_info))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let settings = state.settings.clone();

    Router::new()
        .merge(api::health_routes())
        .nest(&settings.api_prefix, api_routes)
        .layer(DefaultBodyLimit::max(settings.max_request_bytes))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
