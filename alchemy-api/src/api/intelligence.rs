//! Recommendation and team-intelligence endpoints

use alchemy_common::time::now;
use alchemy_core::intelligence::{
    Candidate, IndividualProfile, OptimizationResult, PerformancePredictor, PredictionResult,
    Suggestion, TeamOptimizer, TeamProfile, TeamScoreBreakdown,
};
use alchemy_core::intervention::{TeamHealthMetrics, DEFAULT_MAX_RECOMMENDATIONS};
use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::analysis::{self, recommendation_report, RecommendationReport};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

const DEFAULT_GOAL: &str = "Improve team effectiveness";
const DEFAULT_SUGGESTIONS: usize = 3;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub metrics: TeamHealthMetrics,
    pub max_recommendations: Option<usize>,
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeamRecommendationQuery {
    pub max_recommendations: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TeamScoreRequest {
    pub members: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub candidates: Vec<Candidate>,
    pub team_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub team: Vec<Candidate>,
    pub candidates: Vec<Candidate>,
    pub max_suggestions: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub features: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct FitRequest {
    pub individual: IndividualProfile,
    pub team: TeamProfile,
}

fn ensure_recommendations(state: &AppState) -> ApiResult<()> {
    if state.settings.enable_recommendations {
        Ok(())
    } else {
        Err(ApiError::NotFound("Recommendations are disabled".to_string()))
    }
}

fn ensure_ml(state: &AppState) -> ApiResult<()> {
    if state.settings.enable_ml {
        Ok(())
    } else {
        Err(ApiError::NotFound("Performance prediction is disabled".to_string()))
    }
}

/// Requested count, capped by configuration
fn recommendation_limit(requested: Option<usize>, configured: usize) -> usize {
    requested
        .unwrap_or(DEFAULT_MAX_RECOMMENDATIONS)
        .min(configured)
}

/// POST /recommendations
pub async fn recommendations(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecommendationRequest>,
) -> ApiResult<Json<RecommendationReport>> {
    ensure_recommendations(&state)?;

    let max = recommendation_limit(request.max_recommendations, state.settings.max_recommendations);
    let goal = request.goal.as_deref().unwrap_or(DEFAULT_GOAL);
    Ok(Json(recommendation_report(None, request.metrics, max, goal, now())))
}

/// POST /recommendations/teams/:id
pub async fn team_recommendations(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    Query(query): Query<TeamRecommendationQuery>,
) -> ApiResult<Json<RecommendationReport>> {
    ensure_recommendations(&state)?;

    let max = recommendation_limit(query.max_recommendations, state.settings.max_recommendations);
    Ok(Json(analysis::team_recommendations(&state.db, team_id, max).await?))
}

/// POST /intelligence/team-score
pub async fn team_score(ApiJson(request): ApiJson<TeamScoreRequest>) -> Json<TeamScoreBreakdown> {
    let members: Vec<&Candidate> = request.members.iter().collect();
    Json(TeamOptimizer::new().team_score(&members))
}

/// POST /intelligence/optimize
pub async fn optimize(
    ApiJson(request): ApiJson<OptimizeRequest>,
) -> ApiResult<Json<OptimizationResult>> {
    if request.team_size == 0 {
        return Err(ApiError::Unprocessable("team_size: must be at least 1".to_string()));
    }
    Ok(Json(TeamOptimizer::new().optimize(&request.candidates, request.team_size)))
}

/// POST /intelligence/suggest
pub async fn suggest(ApiJson(request): ApiJson<SuggestRequest>) -> Json<Vec<Suggestion>> {
    let max = request.max_suggestions.unwrap_or(DEFAULT_SUGGESTIONS);
    Json(TeamOptimizer::new().suggest_additions(&request.team, &request.candidates, max))
}

/// POST /intelligence/predict
pub async fn predict(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PredictRequest>,
) -> ApiResult<Json<PredictionResult>> {
    ensure_ml(&state)?;
    Ok(Json(PerformancePredictor::new().predict_team_performance(&request.features)))
}

/// POST /intelligence/predict-fit
pub async fn predict_fit(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<FitRequest>,
) -> ApiResult<Json<PredictionResult>> {
    ensure_ml(&state)?;
    Ok(Json(
        PerformancePredictor::new().predict_individual_fit(&request.individual, &request.team),
    ))
}

pub fn intelligence_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", post(recommendations))
        .route("/recommendations/teams/:id", post(team_recommendations))
        .route("/intelligence/team-score", post(team_score))
        .route("/intelligence/optimize", post(optimize))
        .route("/intelligence/suggest", post(suggest))
        .route("/intelligence/predict", post(predict))
        .route("/intelligence/predict-fit", post(predict_fit))
}
