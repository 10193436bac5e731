//! Database row models
//!
//! One struct per table, in storage form: JSON columns stay as text and
//! timestamps as RFC 3339 strings. The service decodes them at the edge.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub id: i64,
    pub user_id: i64,
    pub archetype: Option<String>,
    /// JSON object of trait name to score
    pub trait_scores: String,
    pub jungian_type: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamAnalysisRow {
    pub id: i64,
    pub team_id: i64,
    pub analysis_type: String,
    /// JSON document produced by the analysis
    pub results: String,
    pub score: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub version: String,
    pub status: String,
    /// JSON document of calculated results, NULL until calculated
    pub results: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub assessment_id: i64,
    pub text: String,
    pub question_type: String,
    /// JSON array of option strings
    pub options: Option<String>,
    pub category: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResponseRow {
    pub id: i64,
    pub assessment_id: i64,
    pub question_id: i64,
    /// Answer as JSON text (number, string, array...)
    pub answer: String,
    pub confidence: Option<f64>,
    pub created_at: String,
}
