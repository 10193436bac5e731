//! Team and individual analysis
//!
//! Shared by the HTTP handlers, the background worker and the CLI. The
//! pure part (`analyze_members`, `analyze_individual`,
//! `compatibility_report`, `recommendation_report`) works on request
//! data; the async part scores stored assessments and loads a stored
//! team from its member profiles.

use alchemy_common::{Error, Result};
use alchemy_core::archetypes::{
    ArchetypeClassifier, JungianMapper, JungianProfile, MbtiType, TeamComposition, TraitProfile,
};
use alchemy_core::assessment::{AssessmentCalculator, AssessmentStatus};
use alchemy_core::intervention::{
    ActionPlan, ActionPlanGenerator, PlanProgress, Recommendation, RecommendationEngine,
    TeamHealthMetrics,
};
use alchemy_core::metrics::{diversity_index, mean, team_metrics, TeamMetrics};
use alchemy_core::psychology::freudian::{
    analyze_conflict_patterns, ConflictAnalysis, DefenseProfile, FreudianAnalyzer,
    PsychosexualDevelopment, StructuralBalance,
};
use alchemy_core::psychology::jungian::{
    collective_patterns, ArchetypalPattern, CollectivePatterns, IndividuationProgress,
    JungianAnalyzer,
};
use alchemy_core::scoring::{CompositeScorer, TeamScore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::db::{analyses, assessments, teams};

/// Score used for a member without trait scores
const NEUTRAL_SCORE: f64 = 50.0;

/// Patterns reported as a member's dominant archetypes
const DOMINANT_PATTERNS: usize = 3;

/// Recommendations attached to a team analysis
const TEAM_RECOMMENDATIONS: usize = 5;

/// Analysis type recorded for stored-team runs
pub const TEAM_DYNAMICS: &str = "team_dynamics";

// ========================================
// Inputs and outputs
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct MemberInput {
    pub user_id: i64,
    pub mbti_type: String,
    #[serde(default)]
    pub behaviors: Vec<String>,
    /// Free-form label; derived from trait scores or MBTI when absent
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub trait_scores: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberAnalysis {
    pub user_id: i64,
    pub mbti_type: MbtiType,
    pub archetype: String,
    pub jungian_profile: JungianProfile,
    pub dominant_archetypes: Vec<ArchetypalPattern>,
    pub defense_mechanisms: Vec<DefenseProfile>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplementaryPair {
    pub user_id_1: i64,
    pub user_id_2: i64,
    pub mbti_types: [MbtiType; 2],
    pub compatibility_score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDynamics {
    pub mbti_distribution: BTreeMap<String, usize>,
    pub archetype_distribution: BTreeMap<String, usize>,
    /// Simpson index over archetypes, 0..100
    pub diversity_score: f64,
    /// Mean pairwise MBTI compatibility; `None` for a single member
    pub average_compatibility: Option<f64>,
    pub complementary_pairs: Vec<ComplementaryPair>,
    pub score_distribution: TeamMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamAnalysis {
    pub team_id: i64,
    pub team_size: usize,
    pub member_analyses: Vec<MemberAnalysis>,
    pub team_dynamics: TeamDynamics,
    pub collective_patterns: CollectivePatterns,
    pub recommendations: Vec<Recommendation>,
    pub team_score: TeamScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<TeamComposition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndividualAnalysis {
    pub user_id: i64,
    pub mbti_type: MbtiType,
    pub jungian_profile: JungianProfile,
    pub dominant_archetypes: Vec<ArchetypalPattern>,
    pub individuation_progress: IndividuationProgress,
    pub defense_mechanisms: Vec<DefenseProfile>,
    pub conflict_analysis: ConflictAnalysis,
    pub structural_balance: StructuralBalance,
    pub psychosexual_development: PsychosexualDevelopment,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairCompatibility {
    pub user_id_1: i64,
    pub user_id_2: i64,
    pub type_1: MbtiType,
    pub type_2: MbtiType,
    pub compatible: bool,
    pub complementary_functions: bool,
    pub compatibility_score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    pub compatibility_matrix: Vec<PairCompatibility>,
    pub overall_compatibility: f64,
    pub total_pairs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    pub metrics: TeamHealthMetrics,
    pub recommendations: Vec<Recommendation>,
    pub quick_wins: Vec<Recommendation>,
    pub action_plan: ActionPlan,
    pub progress: PlanProgress,
}

/// A persisted stored-team analysis
#[derive(Debug, Clone, Serialize)]
pub struct TeamAnalysisRun {
    pub analysis_id: i64,
    #[serde(flatten)]
    pub analysis: TeamAnalysis,
}

// ========================================
// Pure analysis
// ========================================

pub fn parse_mbti(text: &str) -> Result<MbtiType> {
    text.parse::<MbtiType>()
        .map_err(|e| Error::InvalidInput(e.to_string()))
}

struct MemberState {
    analysis: MemberAnalysis,
    patterns: Vec<ArchetypalPattern>,
    individual_score: f64,
}

fn member_recommendations(
    profile: &JungianProfile,
    conflict: &ConflictAnalysis,
    patterns: &[ArchetypalPattern],
) -> Vec<String> {
    let mut recommendations = conflict.recommendations.clone();
    for pattern in patterns.iter().filter(|p| p.is_dominant() && p.needs_integration()) {
        recommendations.push(format!(
            "Integrate the {} pattern through reflective practice",
            pattern.archetype.as_str()
        ));
    }
    recommendations.push(format!(
        "Develop the inferior function ({}) in low-stakes settings",
        profile.inferior_function
    ));
    recommendations
}

fn analyze_member(member: &MemberInput) -> Result<MemberState> {
    let mbti = parse_mbti(&member.mbti_type)?;
    let mapper = JungianMapper::new();
    let jungian_profile = mapper.profile(mbti);

    let traits = match &member.trait_scores {
        Some(scores) if !scores.is_empty() => Some(
            TraitProfile::from_scores(scores.iter().map(|(k, v)| (k.clone(), *v)))
                .map_err(|e| Error::InvalidInput(e.to_string()))?,
        ),
        _ => None,
    };

    let archetype = match (&member.archetype, &traits) {
        (Some(label), _) if !label.trim().is_empty() => label.trim().to_lowercase(),
        (_, Some(traits)) => ArchetypeClassifier::new()
            .classify(traits)
            .primary_archetype
            .as_str()
            .to_string(),
        _ => mapper
            .archetype_affinity(mbti)
            .first()
            .map(|a| a.as_str().to_string())
            .unwrap_or_default(),
    };

    let patterns = JungianAnalyzer::new().identify_active_archetypes(&member.behaviors);
    let defenses = FreudianAnalyzer::new().identify_defenses(&member.behaviors);
    let conflict = analyze_conflict_patterns(&defenses);

    let individual_score = traits
        .as_ref()
        .map(|t| CompositeScorer::new().composite(t.scores()))
        .unwrap_or(NEUTRAL_SCORE);

    let recommendations = member_recommendations(&jungian_profile, &conflict, &patterns);

    Ok(MemberState {
        analysis: MemberAnalysis {
            user_id: member.user_id,
            mbti_type: mbti,
            archetype,
            jungian_profile,
            dominant_archetypes: patterns.iter().take(DOMINANT_PATTERNS).cloned().collect(),
            defense_mechanisms: defenses,
            recommendations,
        },
        patterns,
        individual_score,
    })
}

fn team_dynamics(members: &[MemberAnalysis], individual_scores: &[f64]) -> TeamDynamics {
    let mapper = JungianMapper::new();

    let mut mbti_distribution = BTreeMap::new();
    let mut archetype_distribution = BTreeMap::new();
    for member in members {
        *mbti_distribution.entry(member.mbti_type.to_string()).or_insert(0) += 1;
        if !member.archetype.is_empty() {
            *archetype_distribution.entry(member.archetype.clone()).or_insert(0) += 1;
        }
    }

    let mut scores = Vec::new();
    let mut complementary_pairs = Vec::new();
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            let compat = mapper.compatibility(a.mbti_type, b.mbti_type);
            scores.push(compat.compatibility_score as f64);
            if compat.complementary_functions {
                complementary_pairs.push(ComplementaryPair {
                    user_id_1: a.user_id,
                    user_id_2: b.user_id,
                    mbti_types: [a.mbti_type, b.mbti_type],
                    compatibility_score: compat.compatibility_score,
                });
            }
        }
    }

    TeamDynamics {
        mbti_distribution,
        diversity_score: diversity_index(&archetype_distribution) * 100.0,
        archetype_distribution,
        average_compatibility: (!scores.is_empty()).then(|| mean(&scores)),
        complementary_pairs,
        score_distribution: team_metrics(individual_scores),
    }
}

/// Team-health inputs derived from an analysis
///
/// Conflict is the share of members showing at least one maladaptive
/// defense.
pub fn team_health(analysis: &TeamAnalysis) -> TeamHealthMetrics {
    let conflicted = analysis
        .member_analyses
        .iter()
        .filter(|m| m.defense_mechanisms.iter().any(|d| d.is_maladaptive()))
        .count();
    let conflict_score = if analysis.team_size == 0 {
        0.0
    } else {
        conflicted as f64 / analysis.team_size as f64 * 100.0
    };

    TeamHealthMetrics {
        diversity_score: Some(analysis.team_dynamics.diversity_score),
        communication_score: analysis.team_dynamics.average_compatibility,
        conflict_score: Some(conflict_score),
        ..Default::default()
    }
}

/// Analyze a team from the members supplied in a request
pub fn analyze_members(team_id: i64, members: &[MemberInput]) -> Result<TeamAnalysis> {
    if members.is_empty() {
        return Err(Error::InvalidInput("Team must have at least one member".to_string()));
    }

    let states = members.iter().map(analyze_member).collect::<Result<Vec<_>>>()?;
    let individual_scores: Vec<f64> = states.iter().map(|s| s.individual_score).collect();
    let patterns: Vec<Vec<ArchetypalPattern>> = states.iter().map(|s| s.patterns.clone()).collect();
    let member_analyses: Vec<MemberAnalysis> = states.into_iter().map(|s| s.analysis).collect();

    let dynamics = team_dynamics(&member_analyses, &individual_scores);
    let team_score = CompositeScorer::new().team_score(
        &individual_scores,
        dynamics.average_compatibility.unwrap_or(NEUTRAL_SCORE),
    );

    let mut analysis = TeamAnalysis {
        team_id,
        team_size: member_analyses.len(),
        member_analyses,
        team_dynamics: dynamics,
        collective_patterns: collective_patterns(&patterns),
        recommendations: Vec::new(),
        team_score,
        composition: None,
    };
    analysis.recommendations =
        RecommendationEngine::new().generate(&team_health(&analysis), TEAM_RECOMMENDATIONS);

    debug!(
        team_id,
        team_size = analysis.team_size,
        team_score = analysis.team_score.team_score(),
        "Team analysis complete"
    );
    Ok(analysis)
}

pub fn analyze_individual(
    user_id: i64,
    mbti: MbtiType,
    behaviors: &[String],
) -> IndividualAnalysis {
    let jungian = JungianAnalyzer::new();
    let freudian = FreudianAnalyzer::new();

    let jungian_profile = JungianMapper::new().profile(mbti);
    let patterns = jungian.identify_active_archetypes(behaviors);
    let individuation_progress = jungian.individuation_progress(&patterns);
    let defenses = freudian.identify_defenses(behaviors);
    let conflict_analysis = analyze_conflict_patterns(&defenses);
    let recommendations = member_recommendations(&jungian_profile, &conflict_analysis, &patterns);

    IndividualAnalysis {
        user_id,
        mbti_type: mbti,
        jungian_profile,
        dominant_archetypes: patterns.into_iter().take(DOMINANT_PATTERNS).collect(),
        individuation_progress,
        defense_mechanisms: defenses,
        conflict_analysis,
        structural_balance: freudian.structural_balance(),
        psychosexual_development: freudian.psychosexual_development(),
        recommendations,
    }
}

/// Pairwise MBTI compatibility for a group of users
pub fn compatibility_report(
    user_ids: &[i64],
    mbti_types: &[String],
) -> Result<CompatibilityReport> {
    if user_ids.len() != mbti_types.len() {
        return Err(Error::InvalidInput(
            "user_ids and mbti_types must have the same length".to_string(),
        ));
    }
    if user_ids.len() < 2 {
        return Err(Error::InvalidInput(
            "At least two users are required for a compatibility check".to_string(),
        ));
    }

    let types = mbti_types.iter().map(|t| parse_mbti(t)).collect::<Result<Vec<_>>>()?;
    let mapper = JungianMapper::new();

    let mut matrix = Vec::new();
    for i in 0..types.len() {
        for j in i + 1..types.len() {
            let compat = mapper.compatibility(types[i], types[j]);
            matrix.push(PairCompatibility {
                user_id_1: user_ids[i],
                user_id_2: user_ids[j],
                type_1: types[i],
                type_2: types[j],
                compatible: compat.compatible,
                complementary_functions: compat.complementary_functions,
                compatibility_score: compat.compatibility_score,
            });
        }
    }

    let scores: Vec<f64> = matrix.iter().map(|p| p.compatibility_score as f64).collect();
    Ok(CompatibilityReport {
        overall_compatibility: mean(&scores),
        total_pairs: matrix.len(),
        compatibility_matrix: matrix,
    })
}

/// Recommendations, quick wins and an action plan for the given metrics
pub fn recommendation_report(
    team_id: Option<i64>,
    metrics: TeamHealthMetrics,
    max: usize,
    goal: &str,
    base: DateTime<Utc>,
) -> RecommendationReport {
    let engine = RecommendationEngine::new();
    let planner = ActionPlanGenerator::new();

    let recommendations = engine.generate(&metrics, max);
    let quick_wins = engine.quick_wins(&recommendations);
    let action_plan = planner.generate(goal, &recommendations, base);
    let progress = planner.track_progress(&action_plan);

    RecommendationReport {
        team_id,
        metrics,
        recommendations,
        quick_wins,
        action_plan,
        progress,
    }
}

// ========================================
// Stored assessments
// ========================================

/// Score an assessment's responses and store the results
///
/// The assessment moves to `analyzed`; the stored results JSON is
/// returned.
pub async fn calculate_assessment(db: &SqlitePool, assessment_id: i64) -> Result<Value> {
    let assessment = assessments::get_assessment(db, assessment_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Assessment with id {} not found", assessment_id)))?;
    let questions = assessments::questions(db, assessment_id).await?;

    let score = AssessmentCalculator::new().calculate(&assessment.responses, &questions);
    let results = score.to_json();
    assessments::store_results(db, assessment_id, &results, AssessmentStatus::Analyzed).await?;

    info!(
        assessment_id,
        responses = assessment.responses.len(),
        total_score = score.total_score,
        "Assessment calculated"
    );
    Ok(results)
}

// ========================================
// Stored teams
// ========================================

fn numeric_scores(scores: &Map<String, Value>) -> BTreeMap<String, f64> {
    scores
        .iter()
        .filter_map(|(k, v)| v.as_f64().map(|score| (k.clone(), score)))
        .collect()
}

/// Analyze a stored team from its members' profiles without persisting
///
/// Members without a Jungian type on their profile are skipped.
pub async fn load_team_analysis(db: &SqlitePool, team_id: i64) -> Result<TeamAnalysis> {
    if !teams::team_exists(db, team_id).await? {
        return Err(Error::NotFound(format!("Team with id {} not found", team_id)));
    }

    let members = teams::member_profiles(db, team_id).await?;
    let inputs: Vec<MemberInput> = members
        .iter()
        .filter_map(|member| {
            let profile = member.profile.as_ref()?;
            let mbti_type = profile.jungian_type.clone()?;
            Some(MemberInput {
                user_id: member.user_id,
                mbti_type,
                behaviors: Vec::new(),
                archetype: profile.archetype.clone(),
                trait_scores: Some(numeric_scores(&profile.trait_scores)),
            })
        })
        .collect();

    if inputs.is_empty() {
        return Err(Error::InvalidInput(format!(
            "Team {} has no members with a Jungian type on their profile",
            team_id
        )));
    }
    debug!(team_id, members = members.len(), profiled = inputs.len(), "Loaded team members");

    let mut analysis = analyze_members(team_id, &inputs)?;

    let trait_profiles: Vec<TraitProfile> = inputs
        .iter()
        .filter_map(|m| m.trait_scores.as_ref())
        .filter(|scores| !scores.is_empty())
        .filter_map(|scores| {
            TraitProfile::from_scores(scores.iter().map(|(k, v)| (k.clone(), *v))).ok()
        })
        .collect();
    if !trait_profiles.is_empty() {
        analysis.composition = Some(ArchetypeClassifier::new().classify_team(&trait_profiles));
    }

    Ok(analysis)
}

/// Analyze a stored team and record the result in `team_analyses`
pub async fn analyze_stored_team(db: &SqlitePool, team_id: i64) -> Result<TeamAnalysisRun> {
    let analysis = load_team_analysis(db, team_id).await?;
    let results = serde_json::to_value(&analysis)?;
    let score = analysis.team_score.team_score();
    let analysis_id =
        analyses::insert_analysis(db, team_id, TEAM_DYNAMICS, &results, Some(score)).await?;

    info!(team_id, analysis_id, score, "Stored team analysis");
    Ok(TeamAnalysisRun { analysis_id, analysis })
}

/// Recommendations driven by a fresh analysis of a stored team
pub async fn team_recommendations(
    db: &SqlitePool,
    team_id: i64,
    max: usize,
) -> Result<RecommendationReport> {
    let analysis = load_team_analysis(db, team_id).await?;
    Ok(recommendation_report(
        Some(team_id),
        team_health(&analysis),
        max,
        "Improve team dynamics",
        alchemy_common::time::now(),
    ))
}
