//! Team and individual analysis endpoints

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::analysis::{
    self, analyze_individual, analyze_members, compatibility_report, parse_mbti,
    CompatibilityReport, IndividualAnalysis, MemberInput, TeamAnalysis, TeamAnalysisRun,
};
use crate::db::users;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TeamAnalysisRequest {
    pub team_id: i64,
    pub members: Vec<MemberInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndividualQuery {
    pub mbti_type: Option<String>,
    /// Comma-separated behaviour descriptions
    pub behaviors: Option<String>,
}

impl IndividualQuery {
    fn behavior_list(&self) -> Vec<String> {
        self.behaviors
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct CompatibilityRequest {
    pub user_ids: Vec<i64>,
    pub mbti_types: Vec<String>,
}

/// POST /analysis/team/:id
pub async fn analyze_team(
    Path(team_id): Path<i64>,
    ApiJson(request): ApiJson<TeamAnalysisRequest>,
) -> ApiResult<Json<TeamAnalysis>> {
    if request.team_id != team_id {
        return Err(ApiError::BadRequest(
            "Team ID in path does not match request body".to_string(),
        ));
    }

    let analysis = analyze_members(team_id, &request.members)?;
    info!(
        team_id,
        members = analysis.team_size,
        diversity = analysis.team_dynamics.diversity_score,
        "Team analysed"
    );
    Ok(Json(analysis))
}

/// GET /analysis/individual/:user_id
///
/// Falls back to the stored profile's type when `mbti_type` is omitted.
pub async fn individual(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<IndividualQuery>,
) -> ApiResult<Json<IndividualAnalysis>> {
    let requested = query
        .mbti_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let mbti_text = match requested {
        Some(text) => text.to_string(),
        None => users::get_profile(&state.db, user_id)
            .await?
            .and_then(|p| p.jungian_type)
            .ok_or_else(|| {
                ApiError::BadRequest("MBTI type is required for individual analysis".to_string())
            })?,
    };

    let mbti = parse_mbti(&mbti_text)?;
    Ok(Json(analyze_individual(user_id, mbti, &query.behavior_list())))
}

/// POST /analysis/compatibility
pub async fn compatibility(
    ApiJson(request): ApiJson<CompatibilityRequest>,
) -> ApiResult<Json<CompatibilityReport>> {
    Ok(Json(compatibility_report(&request.user_ids, &request.mbti_types)?))
}

/// POST /analysis/teams/:id/run
pub async fn run_stored_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> ApiResult<Json<TeamAnalysisRun>> {
    Ok(Json(analysis::analyze_stored_team(&state.db, team_id).await?))
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analysis/team/:id", post(analyze_team))
        .route("/analysis/individual/:user_id", get(individual))
        .route("/analysis/compatibility", post(compatibility))
        .route("/analysis/teams/:id/run", post(run_stored_team))
}
