//! Team endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::users::user_not_found;
use crate::db::analyses::{self, StoredAnalysis};
use crate::db::teams::{self, TeamWithMembers};
use crate::db::users;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::pagination::ListParams;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TeamCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TeamCreate {
    fn field_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let len = self.name.chars().count();
        if len == 0 || len > 255 {
            errors.push("name: must be between 1 and 255 characters".to_string());
        }
        if self.description.as_ref().is_some_and(|d| d.chars().count() > 1000) {
            errors.push("description: must be at most 1000 characters".to_string());
        }
        errors
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub message: String,
    pub team_id: i64,
    pub user_id: i64,
}

pub(crate) fn team_not_found(team_id: i64) -> ApiError {
    ApiError::NotFound(format!("Team with id {} not found", team_id))
}

async fn require_team_and_user(state: &AppState, team_id: i64, user_id: i64) -> ApiResult<()> {
    if !teams::team_exists(&state.db, team_id).await? {
        return Err(team_not_found(team_id));
    }
    if users::get_user(&state.db, user_id).await?.is_none() {
        return Err(user_not_found(user_id));
    }
    Ok(())
}

/// POST /teams
pub async fn create_team(
    State(state): State<AppState>,
    ApiJson(create): ApiJson<TeamCreate>,
) -> ApiResult<(StatusCode, Json<TeamWithMembers>)> {
    let errors = create.field_errors();
    if !errors.is_empty() {
        return Err(ApiError::Unprocessable(errors.join("; ")));
    }

    let team = teams::create_team(&state.db, &create.name, create.description.as_deref()).await?;
    info!(team_id = team.id, name = %team.name, "Team created");
    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /teams
pub async fn list_teams(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<TeamWithMembers>>> {
    let (offset, limit) = params.bounds();
    Ok(Json(teams::list_teams(&state.db, offset, limit).await?))
}

/// GET /teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> ApiResult<Json<TeamWithMembers>> {
    teams::get_team(&state.db, team_id)
        .await?
        .map(Json)
        .ok_or_else(|| team_not_found(team_id))
}

/// POST /teams/:id/members/:user_id
pub async fn add_member(
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<Json<MembershipResponse>> {
    require_team_and_user(&state, team_id, user_id).await?;

    if !teams::add_member(&state.db, team_id, user_id).await? {
        return Err(ApiError::BadRequest(format!(
            "User {} is already a member of team {}",
            user_id, team_id
        )));
    }

    info!(team_id, user_id, "Member added");
    Ok(Json(MembershipResponse {
        message: "User added to team successfully".to_string(),
        team_id,
        user_id,
    }))
}

/// DELETE /teams/:id/members/:user_id
pub async fn remove_member(
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<Json<MembershipResponse>> {
    require_team_and_user(&state, team_id, user_id).await?;

    if !teams::remove_member(&state.db, team_id, user_id).await? {
        return Err(ApiError::NotFound(format!(
            "User {} is not a member of team {}",
            user_id, team_id
        )));
    }

    info!(team_id, user_id, "Member removed");
    Ok(Json(MembershipResponse {
        message: "User removed from team successfully".to_string(),
        team_id,
        user_id,
    }))
}

/// GET /teams/:id/analyses
pub async fn list_analyses(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> ApiResult<Json<Vec<StoredAnalysis>>> {
    if !teams::team_exists(&state.db, team_id).await? {
        return Err(team_not_found(team_id));
    }
    Ok(Json(analyses::list_for_team(&state.db, team_id).await?))
}

pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/teams", post(create_team).get(list_teams))
        .route("/teams/:id", get(get_team))
        .route("/teams/:id/members/:user_id", post(add_member).delete(remove_member))
        .route("/teams/:id/analyses", get(list_analyses))
}
