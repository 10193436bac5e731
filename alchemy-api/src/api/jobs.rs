//! Background job endpoints

use alchemy_common::sse::broadcast_sse_stream;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiJson, ApiResult};
use crate::worker::{JobRecord, JobStatus, JobTask};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub task: JobTask,
    pub target_id: i64,
}

#[derive(Debug, Serialize)]
pub struct JobAccepted {
    pub job_id: Uuid,
    pub status: JobStatus,
}

/// POST /jobs
pub async fn submit_job(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<JobRequest>,
) -> ApiResult<(StatusCode, Json<JobAccepted>)> {
    let record = state.jobs.submit(request.task, request.target_id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(JobAccepted {
            job_id: record.job_id,
            status: record.status,
        }),
    ))
}

/// GET /jobs/:job_id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<JobRecord>> {
    state
        .jobs
        .get(job_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job_id)))
}

/// GET /jobs/events
pub async fn job_events(State(state): State<AppState>) -> impl IntoResponse {
    broadcast_sse_stream("jobs", state.jobs.subscribe(), state.shutdown.clone())
}

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(submit_job))
        .route("/jobs/events", get(job_events))
        .route("/jobs/:job_id", get(get_job))
}
