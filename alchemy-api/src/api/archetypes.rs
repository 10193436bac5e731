//! Archetype definitions and classification

use alchemy_core::archetypes::{
    definition, definitions, ArchetypeClassifier, ArchetypeDefinition, ArchetypeType,
    ClassificationResult, TraitProfile, UnknownArchetype,
};
use axum::{
    extract::Path,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ArchetypesResponse {
    pub archetypes: BTreeMap<&'static str, &'static ArchetypeDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub trait_scores: BTreeMap<String, f64>,
}

/// GET /archetypes
pub async fn list_archetypes() -> Json<ArchetypesResponse> {
    let archetypes = definitions()
        .iter()
        .map(|d| (d.archetype_type.as_str(), d))
        .collect();
    Json(ArchetypesResponse { archetypes })
}

/// GET /archetypes/:type
pub async fn get_archetype(
    Path(archetype_type): Path<String>,
) -> ApiResult<Json<&'static ArchetypeDefinition>> {
    let parsed: ArchetypeType = archetype_type
        .parse()
        .map_err(|e: UnknownArchetype| ApiError::NotFound(e.to_string()))?;
    Ok(Json(definition(parsed)))
}

/// POST /archetypes/classify
pub async fn classify(
    ApiJson(request): ApiJson<ClassifyRequest>,
) -> ApiResult<Json<ClassificationResult>> {
    let profile = TraitProfile::from_scores(request.trait_scores)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(ArchetypeClassifier::new().classify(&profile)))
}

pub fn archetype_routes() -> Router<AppState> {
    Router::new()
        .route("/archetypes", get(list_archetypes))
        .route("/archetypes/classify", post(classify))
        .route("/archetypes/:archetype_type", get(get_archetype))
}
