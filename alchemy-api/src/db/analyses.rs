//! Stored team analyses

use alchemy_common::db::TeamAnalysisRow;
use alchemy_common::time::now_rfc3339;
use alchemy_common::Result;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use super::decode_json;

#[derive(Debug, Clone, Serialize)]
pub struct StoredAnalysis {
    pub id: i64,
    pub team_id: i64,
    pub analysis_type: String,
    pub results: Value,
    pub score: Option<f64>,
    pub created_at: String,
}

impl TryFrom<TeamAnalysisRow> for StoredAnalysis {
    type Error = alchemy_common::Error;

    fn try_from(row: TeamAnalysisRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            team_id: row.team_id,
            analysis_type: row.analysis_type,
            results: decode_json("team_analyses.results", &row.results)?,
            score: row.score,
            created_at: row.created_at,
        })
    }
}

pub async fn insert_analysis(
    pool: &SqlitePool,
    team_id: i64,
    analysis_type: &str,
    results: &Value,
    score: Option<f64>,
) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO team_analyses (team_id, analysis_type, results, score, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(team_id)
    .bind(analysis_type)
    .bind(serde_json::to_string(results)?)
    .bind(score)
    .bind(now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Newest first
pub async fn list_for_team(pool: &SqlitePool, team_id: i64) -> Result<Vec<StoredAnalysis>> {
    let rows = sqlx::query_as::<_, TeamAnalysisRow>(
        r#"
        SELECT id, team_id, analysis_type, results, score, created_at
        FROM team_analyses
        WHERE team_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(team_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StoredAnalysis::try_from).collect()
}
