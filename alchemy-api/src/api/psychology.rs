//! Jungian, Freudian, shadow-work and case-study endpoints

use alchemy_core::archetypes::{JungianMapper, JungianProfile, MbtiType, TypeCompatibility};
use alchemy_core::psychology::case_studies::Lesson;
use alchemy_core::psychology::shadow_work::{Exercise, IntegrationProgress, TeamShadowDynamics};
use alchemy_core::psychology::{
    analyze_conflict_patterns, exercises, team_shadow_dynamics, CaseStudyDetail, CaseStudyMapper,
    CaseStudySummary, ConflictAnalysis, DefenseMechanism, DefenseProfile, FreudianAnalyzer,
    ShadowAspect, ShadowElement, ShadowWorkAnalyzer, ShadowWorkPlan,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::parse_mbti;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

const MAX_SIMILAR_CASES: usize = 20;

// ========================================
// Jungian
// ========================================

#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub mbti_type: MbtiType,
    pub archetype_affinity: Vec<String>,
    pub strengths: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TypesResponse {
    pub types: Vec<TypeSummary>,
}

/// GET /psychology/jungian/profile/:mbti_type
pub async fn jungian_profile(Path(mbti_type): Path<String>) -> ApiResult<Json<JungianProfile>> {
    let mbti = parse_mbti(&mbti_type)?;
    Ok(Json(JungianMapper::new().profile(mbti)))
}

/// GET /psychology/jungian/compatibility/:type1/:type2
pub async fn jungian_compatibility(
    Path((type1, type2)): Path<(String, String)>,
) -> ApiResult<Json<TypeCompatibility>> {
    let (a, b) = (parse_mbti(&type1)?, parse_mbti(&type2)?);
    Ok(Json(JungianMapper::new().compatibility(a, b)))
}

/// GET /psychology/jungian/types
pub async fn mbti_types() -> Json<TypesResponse> {
    let mapper = JungianMapper::new();
    let types = MbtiType::ALL
        .into_iter()
        .map(|t| {
            let profile = mapper.profile(t);
            TypeSummary {
                mbti_type: t,
                archetype_affinity: profile.archetype_affinity,
                strengths: profile.strengths,
            }
        })
        .collect();
    Json(TypesResponse { types })
}

// ========================================
// Freudian
// ========================================

#[derive(Debug, Deserialize)]
pub struct DefenseRequest {
    pub behaviors: Vec<String>,
    /// Accepted for compatibility; not used in scoring
    #[serde(default)]
    pub stress_responses: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct DefenseAnalysisResponse {
    pub defense_profiles: Vec<DefenseProfile>,
    #[serde(flatten)]
    pub conflict: ConflictAnalysis,
}

#[derive(Debug, Serialize)]
pub struct MechanismInfo {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Serialize)]
pub struct MechanismsResponse {
    pub mechanisms: Vec<MechanismInfo>,
}

/// POST /psychology/freudian/defense-mechanisms
pub async fn defense_mechanisms(
    ApiJson(request): ApiJson<DefenseRequest>,
) -> Json<DefenseAnalysisResponse> {
    let defense_profiles = FreudianAnalyzer::new().identify_defenses(&request.behaviors);
    let conflict = analyze_conflict_patterns(&defense_profiles);
    Json(DefenseAnalysisResponse {
        defense_profiles,
        conflict,
    })
}

/// GET /psychology/freudian/mechanisms
pub async fn list_mechanisms() -> Json<MechanismsResponse> {
    let mechanisms = DefenseMechanism::ALL
        .iter()
        .map(|m| MechanismInfo {
            name: m.as_str(),
            type_name: m.type_name(),
        })
        .collect();
    Json(MechanismsResponse { mechanisms })
}

// ========================================
// Shadow work
// ========================================

#[derive(Debug, Default, Deserialize)]
pub struct ShadowRequest {
    #[serde(default)]
    pub assessment_data: Value,
    #[serde(default)]
    pub behaviors: Vec<String>,
    #[serde(default)]
    pub projections: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeamShadowRequest {
    pub members: Vec<ShadowRequest>,
}

#[derive(Debug, Serialize)]
pub struct AspectExercises {
    pub aspect: ShadowAspect,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Serialize)]
pub struct ShadowAnalysisResponse {
    pub shadow_elements: Vec<ShadowElement>,
    pub integration_plans: Vec<ShadowWorkPlan>,
    pub exercises: Vec<AspectExercises>,
    pub progress: IntegrationProgress,
}

fn ensure_shadow_work(state: &AppState) -> ApiResult<()> {
    if state.settings.enable_shadow_work {
        Ok(())
    } else {
        Err(ApiError::NotFound("Shadow work analysis is disabled".to_string()))
    }
}

/// Shadow elements for one person
///
/// Behaviors that read as projection add their contexts to the reported
/// projections.
fn shadow_elements(request: &ShadowRequest) -> Vec<ShadowElement> {
    let mut projections = request.projections.clone();
    for profile in FreudianAnalyzer::new().identify_defenses(&request.behaviors) {
        if profile.mechanism == DefenseMechanism::Projection {
            for context in profile.contexts {
                if !projections.contains(&context) {
                    projections.push(context);
                }
            }
        }
    }
    ShadowWorkAnalyzer::new().identify_shadow_elements(&request.assessment_data, &projections)
}

/// POST /psychology/shadow-work/analyze
pub async fn analyze_shadow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ShadowRequest>,
) -> ApiResult<Json<ShadowAnalysisResponse>> {
    ensure_shadow_work(&state)?;

    let analyzer = ShadowWorkAnalyzer::new();
    let elements = shadow_elements(&request);

    let integration_plans = elements
        .iter()
        .filter(|e| e.needs_work())
        .map(|e| analyzer.integration_plan(e))
        .collect();

    let mut grouped: Vec<AspectExercises> = Vec::new();
    for element in &elements {
        if grouped.iter().all(|g| g.aspect != element.aspect_type) {
            grouped.push(AspectExercises {
                aspect: element.aspect_type,
                exercises: exercises(element),
            });
        }
    }

    let progress = analyzer.integration_progress(&elements, "current");
    Ok(Json(ShadowAnalysisResponse {
        shadow_elements: elements,
        integration_plans,
        exercises: grouped,
        progress,
    }))
}

/// POST /psychology/shadow-work/team
pub async fn team_shadow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TeamShadowRequest>,
) -> ApiResult<Json<TeamShadowDynamics>> {
    ensure_shadow_work(&state)?;
    let members: Vec<Vec<ShadowElement>> = request.members.iter().map(shadow_elements).collect();
    Ok(Json(team_shadow_dynamics(&members)))
}

// ========================================
// Case studies
// ========================================

fn default_limit() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct SimilarCasesRequest {
    pub profile: Map<String, Value>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl SimilarCasesRequest {
    fn checked_limit(&self) -> ApiResult<usize> {
        if (1..=MAX_SIMILAR_CASES).contains(&self.limit) {
            Ok(self.limit)
        } else {
            Err(ApiError::Unprocessable(format!(
                "limit: must be between 1 and {}",
                MAX_SIMILAR_CASES
            )))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FrameworksResponse {
    pub frameworks: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CaseRecommendations {
    pub recommendations: Vec<String>,
    pub similar_cases: Vec<CaseStudySummary>,
    pub lessons: Vec<Lesson>,
}

/// GET /psychology/case-studies
pub async fn list_case_studies() -> Json<Vec<CaseStudySummary>> {
    Json(CaseStudyMapper::new().all().iter().map(|c| c.to_summary()).collect())
}

/// GET /psychology/case-studies/frameworks
pub async fn list_frameworks() -> Json<FrameworksResponse> {
    Json(FrameworksResponse {
        frameworks: CaseStudyMapper::new().frameworks(),
    })
}

/// GET /psychology/case-studies/:case_id
pub async fn get_case_study(Path(case_id): Path<String>) -> ApiResult<Json<CaseStudyDetail>> {
    CaseStudyMapper::new()
        .by_id(&case_id)
        .map(|c| Json(c.to_detail()))
        .ok_or_else(|| ApiError::NotFound(format!("Case study not found: {}", case_id)))
}

/// POST /psychology/case-studies/similar
pub async fn similar_cases(
    ApiJson(request): ApiJson<SimilarCasesRequest>,
) -> ApiResult<Json<Vec<CaseStudySummary>>> {
    let limit = request.checked_limit()?;
    let cases = CaseStudyMapper::new().find_similar(&request.profile, limit);
    Ok(Json(cases.iter().map(|c| c.to_summary()).collect()))
}

/// POST /psychology/case-studies/recommendations
pub async fn case_recommendations(
    ApiJson(request): ApiJson<SimilarCasesRequest>,
) -> ApiResult<Json<CaseRecommendations>> {
    let limit = request.checked_limit()?;
    let mapper = CaseStudyMapper::new();
    let similar = mapper.find_similar(&request.profile, limit);

    Ok(Json(CaseRecommendations {
        recommendations: mapper.recommend_interventions(&request.profile),
        similar_cases: similar.iter().map(|c| c.to_summary()).collect(),
        lessons: mapper.extract_lessons(&similar),
    }))
}

pub fn psychology_routes() -> Router<AppState> {
    Router::new()
        .route("/psychology/jungian/profile/:mbti_type", get(jungian_profile))
        .route(
            "/psychology/jungian/compatibility/:type1/:type2",
            get(jungian_compatibility),
        )
        .route("/psychology/jungian/types", get(mbti_types))
        .route(
            "/psychology/freudian/defense-mechanisms",
            post(defense_mechanisms),
        )
        .route("/psychology/freudian/mechanisms", get(list_mechanisms))
        .route("/psychology/shadow-work/analyze", post(analyze_shadow))
        .route("/psychology/shadow-work/team", post(team_shadow))
        .route("/psychology/case-studies", get(list_case_studies))
        .route("/psychology/case-studies/frameworks", get(list_frameworks))
        .route("/psychology/case-studies/similar", post(similar_cases))
        .route(
            "/psychology/case-studies/recommendations",
            post(case_recommendations),
        )
        .route("/psychology/case-studies/:case_id", get(get_case_study))
}
