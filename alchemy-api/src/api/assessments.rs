//! Assessment endpoints

use alchemy_common::time::now;
use alchemy_core::assessment::{
    failure_message, Assessment, AssessmentCreate, AssessmentStatus, AssessmentValidator, Question,
    Response, ResponseInput,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::analysis;
use crate::db::assessments;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::pagination::ListParams;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub assessment_id: i64,
    pub status: &'static str,
    pub results: Value,
}

pub(crate) fn assessment_not_found(assessment_id: i64) -> ApiError {
    ApiError::NotFound(format!("Assessment with id {} not found", assessment_id))
}

/// Structural checks on a draft before anything is stored
fn validate_draft(create: &AssessmentCreate) -> ApiResult<()> {
    let errors = create.field_errors();
    if !errors.is_empty() {
        return Err(ApiError::Unprocessable(errors.join("; ")));
    }

    let created = now();
    let draft = Assessment {
        id: 0,
        title: create.title.clone(),
        description: create.description.clone(),
        version: create.version.clone(),
        status: AssessmentStatus::Draft,
        created_at: created,
        updated_at: created,
        responses: Vec::new(),
        results: None,
    };
    let questions: Vec<Question> = create
        .questions
        .iter()
        .zip(1..)
        .map(|(q, id)| Question {
            id,
            text: q.text.clone(),
            question_type: q.question_type,
            options: q.options.clone(),
            category: q.category.clone(),
            weight: q.weight,
        })
        .collect();

    let result = AssessmentValidator::new().validate_assessment(&draft, &questions);
    if result.has_errors() {
        return Err(ApiError::BadRequest(failure_message(&result.errors)));
    }
    Ok(())
}

/// POST /assessments
pub async fn create_assessment(
    State(state): State<AppState>,
    ApiJson(create): ApiJson<AssessmentCreate>,
) -> ApiResult<(StatusCode, Json<Assessment>)> {
    validate_draft(&create)?;

    let assessment = assessments::create_assessment(&state.db, &create).await?;
    info!(
        assessment_id = assessment.id,
        questions = create.questions.len(),
        "Assessment created"
    );
    Ok((StatusCode::CREATED, Json(assessment)))
}

/// GET /assessments
pub async fn list_assessments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Assessment>>> {
    let (offset, limit) = params.bounds();
    Ok(Json(assessments::list_assessments(&state.db, offset, limit).await?))
}

/// GET /assessments/:id
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(assessment_id): Path<i64>,
) -> ApiResult<Json<Assessment>> {
    assessments::get_assessment(&state.db, assessment_id)
        .await?
        .map(Json)
        .ok_or_else(|| assessment_not_found(assessment_id))
}

/// GET /assessments/:id/questions
pub async fn list_questions(
    State(state): State<AppState>,
    Path(assessment_id): Path<i64>,
) -> ApiResult<Json<Vec<Question>>> {
    if assessments::get_assessment(&state.db, assessment_id).await?.is_none() {
        return Err(assessment_not_found(assessment_id));
    }
    Ok(Json(assessments::questions(&state.db, assessment_id).await?))
}

/// POST /assessments/:id/responses
pub async fn submit_response(
    State(state): State<AppState>,
    Path(assessment_id): Path<i64>,
    ApiJson(input): ApiJson<ResponseInput>,
) -> ApiResult<(StatusCode, Json<Response>)> {
    if assessments::get_assessment(&state.db, assessment_id).await?.is_none() {
        return Err(assessment_not_found(assessment_id));
    }
    if assessments::get_question(&state.db, assessment_id, input.question_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "Question with id {} not found",
            input.question_id
        )));
    }

    let confidence_errors = AssessmentValidator::new().validate_confidence(input.confidence);
    if !confidence_errors.is_empty() {
        return Err(ApiError::BadRequest(failure_message(&confidence_errors)));
    }

    let response = assessments::insert_response(&state.db, assessment_id, &input).await?;
    info!(assessment_id, question_id = input.question_id, "Response recorded");
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /assessments/:id/calculate
pub async fn calculate_results(
    State(state): State<AppState>,
    Path(assessment_id): Path<i64>,
) -> ApiResult<Json<CalculationResponse>> {
    let results = analysis::calculate_assessment(&state.db, assessment_id).await?;
    Ok(Json(CalculationResponse {
        assessment_id,
        status: "completed",
        results,
    }))
}

pub fn assessment_routes() -> Router<AppState> {
    Router::new()
        .route("/assessments", post(create_assessment).get(list_assessments))
        .route("/assessments/:id", get(get_assessment))
        .route("/assessments/:id/questions", get(list_questions))
        .route("/assessments/:id/responses", post(submit_response))
        .route("/assessments/:id/calculate", post(calculate_results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(questions: usize) -> AssessmentCreate {
        let questions: Vec<Value> = (0..questions)
            .map(|i| {
                json!({
                    "text": format!("Question {}", i),
                    "question_type": "scale",
                    "category": "cognitive"
                })
            })
            .collect();
        serde_json::from_value(json!({"title": "Working Styles", "questions": questions})).unwrap()
    }

    #[test]
    fn test_too_few_questions_is_bad_request() {
        let err = validate_draft(&draft(2)).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Validation failed: questions:"));
    }

    #[test]
    fn test_empty_title_is_unprocessable() {
        let mut create = draft(5);
        create.title = String::new();
        assert_eq!(validate_draft(&create).unwrap_err().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_valid_draft() {
        assert!(validate_draft(&draft(5)).is_ok());
    }
}
