//! Assessments, their questions and responses

use alchemy_common::db::{AssessmentRow, QuestionRow, ResponseRow};
use alchemy_common::time::{now_rfc3339, parse_rfc3339};
use alchemy_common::{Error, Result};
use alchemy_core::assessment::{
    Assessment, AssessmentCreate, AssessmentStatus, Question, Response, ResponseInput,
};
use serde_json::Value;
use sqlx::SqlitePool;

use super::decode_json;

const ASSESSMENT_COLUMNS: &str =
    "id, title, description, version, status, results, created_at, updated_at";

fn to_question(row: QuestionRow) -> Result<Question> {
    let question_type = row
        .question_type
        .parse()
        .map_err(|e: String| Error::Internal(format!("questions.question_type: {}", e)))?;
    let options = row
        .options
        .as_deref()
        .map(|text| decode_json("questions.options", text))
        .transpose()?;

    Ok(Question {
        id: row.id,
        text: row.text,
        question_type,
        options,
        category: row.category,
        weight: row.weight,
    })
}

fn to_response(row: ResponseRow) -> Result<Response> {
    Ok(Response {
        id: row.id,
        assessment_id: row.assessment_id,
        question_id: row.question_id,
        answer: decode_json("responses.answer", &row.answer)?,
        confidence: row.confidence,
        created_at: parse_rfc3339(&row.created_at),
    })
}

fn to_assessment(row: AssessmentRow, responses: Vec<Response>) -> Result<Assessment> {
    let status: AssessmentStatus = row
        .status
        .parse()
        .map_err(|e: String| Error::Internal(format!("assessments.status: {}", e)))?;
    let results = row
        .results
        .as_deref()
        .map(|text| decode_json::<Value>("assessments.results", text))
        .transpose()?;

    Ok(Assessment {
        id: row.id,
        title: row.title,
        description: row.description,
        version: row.version,
        status,
        created_at: parse_rfc3339(&row.created_at),
        updated_at: parse_rfc3339(&row.updated_at),
        responses,
        results,
    })
}

/// Insert an assessment and its questions in one transaction
pub async fn create_assessment(pool: &SqlitePool, create: &AssessmentCreate) -> Result<Assessment> {
    let now = now_rfc3339();
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, AssessmentRow>(&format!(
        r#"
        INSERT INTO assessments (title, description, version, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        ASSESSMENT_COLUMNS
    ))
    .bind(&create.title)
    .bind(&create.description)
    .bind(&create.version)
    .bind(AssessmentStatus::Draft.as_str())
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    for question in &create.questions {
        let options = question
            .options
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        sqlx::query(
            r#"
            INSERT INTO questions (assessment_id, text, question_type, options, category, weight)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.id)
        .bind(&question.text)
        .bind(question.question_type.as_str())
        .bind(&options)
        .bind(&question.category)
        .bind(question.weight)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    to_assessment(row, Vec::new())
}

pub async fn get_assessment(pool: &SqlitePool, assessment_id: i64) -> Result<Option<Assessment>> {
    let row = sqlx::query_as::<_, AssessmentRow>(&format!(
        "SELECT {} FROM assessments WHERE id = ?",
        ASSESSMENT_COLUMNS
    ))
    .bind(assessment_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let responses = responses(pool, row.id).await?;
            Ok(Some(to_assessment(row, responses)?))
        }
        None => Ok(None),
    }
}

pub async fn list_assessments(
    pool: &SqlitePool,
    offset: i64,
    limit: i64,
) -> Result<Vec<Assessment>> {
    let rows = sqlx::query_as::<_, AssessmentRow>(&format!(
        "SELECT {} FROM assessments ORDER BY id LIMIT ? OFFSET ?",
        ASSESSMENT_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut assessments = Vec::with_capacity(rows.len());
    for row in rows {
        let responses = responses(pool, row.id).await?;
        assessments.push(to_assessment(row, responses)?);
    }
    Ok(assessments)
}

pub async fn questions(pool: &SqlitePool, assessment_id: i64) -> Result<Vec<Question>> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, assessment_id, text, question_type, options, category, weight
        FROM questions WHERE assessment_id = ? ORDER BY id
        "#,
    )
    .bind(assessment_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(to_question).collect()
}

/// A question, only if it belongs to the assessment
pub async fn get_question(
    pool: &SqlitePool,
    assessment_id: i64,
    question_id: i64,
) -> Result<Option<Question>> {
    let row = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, assessment_id, text, question_type, options, category, weight
        FROM questions WHERE id = ? AND assessment_id = ?
        "#,
    )
    .bind(question_id)
    .bind(assessment_id)
    .fetch_optional(pool)
    .await?;

    row.map(to_question).transpose()
}

pub async fn responses(pool: &SqlitePool, assessment_id: i64) -> Result<Vec<Response>> {
    let rows = sqlx::query_as::<_, ResponseRow>(
        r#"
        SELECT id, assessment_id, question_id, answer, confidence, created_at
        FROM responses WHERE assessment_id = ? ORDER BY id
        "#,
    )
    .bind(assessment_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(to_response).collect()
}

/// Store a response; a draft assessment moves to in_progress
pub async fn insert_response(
    pool: &SqlitePool,
    assessment_id: i64,
    input: &ResponseInput,
) -> Result<Response> {
    let now = now_rfc3339();
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ResponseRow>(
        r#"
        INSERT INTO responses (assessment_id, question_id, answer, confidence, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, assessment_id, question_id, answer, confidence, created_at
        "#,
    )
    .bind(assessment_id)
    .bind(input.question_id)
    .bind(serde_json::to_string(&input.answer)?)
    .bind(input.confidence)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE assessments SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
        .bind(AssessmentStatus::InProgress.as_str())
        .bind(&now)
        .bind(assessment_id)
        .bind(AssessmentStatus::Draft.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    to_response(row)
}

pub async fn store_results(
    pool: &SqlitePool,
    assessment_id: i64,
    results: &Value,
    status: AssessmentStatus,
) -> Result<()> {
    sqlx::query("UPDATE assessments SET results = ?, status = ?, updated_at = ? WHERE id = ?")
        .bind(serde_json::to_string(results)?)
        .bind(status.as_str())
        .bind(now_rfc3339())
        .bind(assessment_id)
        .execute(pool)
        .await?;

    Ok(())
}
