//! User and profile endpoints

use alchemy_common::db::UserRow;
use alchemy_core::archetypes::{ArchetypeType, MbtiType, TraitProfile};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::info;

use crate::db::users::{self, ProfileUpdate, UserProfile};
use crate::db::is_unique_violation;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::pagination::ListParams;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub name: String,
}

impl UserCreate {
    fn field_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let email = self.email.trim();
        let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        });
        if !well_formed || email.len() > 255 {
            errors.push("email: must be a valid email address".to_string());
        }
        let len = self.name.trim().chars().count();
        if len == 0 || len > 255 {
            errors.push("name: must be between 1 and 255 characters".to_string());
        }
        errors
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub trait_scores: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub jungian_type: Option<String>,
}

impl ProfileRequest {
    /// Validate and normalize into a stored update
    fn into_update(self) -> ApiResult<ProfileUpdate> {
        let archetype = self
            .archetype
            .map(|a| a.parse::<ArchetypeType>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
            .map(|a| a.as_str().to_string());

        let jungian_type = self
            .jungian_type
            .map(|t| t.parse::<MbtiType>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
            .map(|t| t.as_str().to_string());

        let trait_scores = match self.trait_scores {
            Some(scores) => {
                let profile = TraitProfile::from_scores(scores)
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                let map: Map<String, Value> = profile
                    .scores()
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(*v)))
                    .collect();
                Some(map)
            }
            None => None,
        };

        Ok(ProfileUpdate {
            archetype,
            trait_scores,
            jungian_type,
        })
    }
}

pub(crate) fn user_not_found(user_id: i64) -> ApiError {
    ApiError::NotFound(format!("User with id {} not found", user_id))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(create): ApiJson<UserCreate>,
) -> ApiResult<(StatusCode, Json<UserRow>)> {
    let errors = create.field_errors();
    if !errors.is_empty() {
        return Err(ApiError::Unprocessable(errors.join("; ")));
    }

    let email = create.email.trim().to_lowercase();
    match users::create_user(&state.db, &email, create.name.trim()).await {
        Ok(user) => {
            info!(user_id = user.id, "User created");
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(e) if is_unique_violation(&e) => Err(ApiError::Conflict(format!(
            "User with email {} already exists",
            email
        ))),
        Err(e) => Err(e.into()),
    }
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<UserRow>>> {
    let (offset, limit) = params.bounds();
    Ok(Json(users::list_users(&state.db, offset, limit).await?))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserRow>> {
    users::get_user(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| user_not_found(user_id))
}

/// GET /users/:id/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserProfile>> {
    if users::get_user(&state.db, user_id).await?.is_none() {
        return Err(user_not_found(user_id));
    }
    users::get_profile(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Profile for user {} not found", user_id)))
}

/// PUT /users/:id/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ApiJson(request): ApiJson<ProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    if users::get_user(&state.db, user_id).await?.is_none() {
        return Err(user_not_found(user_id));
    }
    let update = request.into_update()?;
    let profile = users::upsert_profile(&state.db, user_id, update).await?;
    info!(
        user_id,
        archetype = ?profile.archetype,
        jungian_type = ?profile.jungian_type,
        "Profile updated"
    );
    Ok(Json(profile))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id/profile", get(get_profile).put(update_profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_checks() {
        let ok = UserCreate {
            email: "ada@example.com".into(),
            name: "Ada".into(),
        };
        assert!(ok.field_errors().is_empty());

        let bad = UserCreate {
            email: "not-an-email".into(),
            name: String::new(),
        };
        assert_eq!(bad.field_errors().len(), 2);
    }

    #[test]
    fn test_profile_request_normalizes() {
        let update = ProfileRequest {
            archetype: Some("Leader".into()),
            trait_scores: Some(BTreeMap::from([("Vision".to_string(), 80.0)])),
            jungian_type: Some("entj".into()),
        }
        .into_update()
        .unwrap();
        assert_eq!(update.archetype.as_deref(), Some("leader"));
        assert_eq!(update.jungian_type.as_deref(), Some("ENTJ"));
        assert_eq!(update.trait_scores.unwrap()["Vision"], 80.0);
    }

    #[test]
    fn test_profile_request_rejects_out_of_range() {
        let err = ProfileRequest {
            trait_scores: Some(BTreeMap::from([("Vision".to_string(), 120.0)])),
            ..Default::default()
        }
        .into_update()
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
