//! Health and service-info endpoints
//!
//! None of these require authentication.

use alchemy_common::time::{now, to_rfc3339};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET / and GET /health
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: &'static str,
}

/// GET /healthz
#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub name: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
    pub uptime_seconds: i64,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /healthz/detailed
#[derive(Debug, Serialize)]
pub struct DetailedHealth {
    pub status: &'static str,
    pub name: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
    pub components: BTreeMap<&'static str, ComponentHealth>,
}

fn service_info(state: &AppState) -> ServiceInfo {
    ServiceInfo {
        name: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
        status: "running",
    }
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(service_info(&state))
}

pub async fn health_check(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(service_info(&state))
}

pub async fn liveness(State(state): State<AppState>) -> Json<Liveness> {
    let current = now();
    Json(Liveness {
        status: "healthy",
        name: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
        environment: state.settings.environment.to_string(),
        timestamp: to_rfc3339(&current),
        uptime_seconds: (current - state.startup_time).num_seconds(),
    })
}

/// Component checks; hidden in production
pub async fn detailed(State(state): State<AppState>) -> ApiResult<Json<DetailedHealth>> {
    if state.settings.is_production() {
        return Err(ApiError::NotFound("Not found".to_string()));
    }

    let mut components = BTreeMap::new();

    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => ComponentHealth {
            status: "healthy",
            detail: None,
        },
        Err(e) => ComponentHealth {
            status: "unhealthy",
            detail: Some(e.to_string()),
        },
    };
    components.insert("database", database);

    let worker = if state.jobs.is_running() {
        ComponentHealth {
            status: "healthy",
            detail: None,
        }
    } else {
        ComponentHealth {
            status: "unhealthy",
            detail: Some("Job worker has stopped".to_string()),
        }
    };
    components.insert("worker", worker);

    let status = if components.values().all(|c| c.status == "healthy") {
        "healthy"
    } else {
        "degraded"
    };

    Ok(Json(DetailedHealth {
        status,
        name: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
        environment: state.settings.environment.to_string(),
        timestamp: to_rfc3339(&now()),
        components,
    }))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/healthz", get(liveness))
        .route("/healthz/detailed", get(detailed))
}
