//! Assessment, question and response validation

use super::models::{Assessment, AssessmentStatus, Question, QuestionType, Response};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// `"Validation failed: field: message; field: message"`
pub fn failure_message(errors: &[ValidationError]) -> String {
    let joined = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    format!("Validation failed: {}", joined)
}

pub struct AssessmentValidator {
    pub min_questions: usize,
    pub max_questions: usize,
    /// Fraction of questions that should be answered before completion
    pub min_completion_rate: f64,
}

impl AssessmentValidator {
    pub fn new() -> Self {
        Self {
            min_questions: 5,
            max_questions: 200,
            min_completion_rate: 0.8,
        }
    }

    pub fn validate_assessment(
        &self,
        assessment: &Assessment,
        questions: &[Question],
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if assessment.title.trim().is_empty() {
            errors.push(ValidationError::error("title", "Assessment title is required"));
        }

        if questions.len() < self.min_questions {
            errors.push(ValidationError::error(
                "questions",
                format!("Assessment must have at least {} questions", self.min_questions),
            ));
        } else if questions.len() > self.max_questions {
            errors.push(ValidationError::error(
                "questions",
                format!("Assessment cannot have more than {} questions", self.max_questions),
            ));
        }

        errors.extend(self.validate_questions(questions));

        if assessment.status == AssessmentStatus::Completed {
            let (response_errors, response_warnings) =
                self.validate_responses(&assessment.responses, questions);
            errors.extend(response_errors);
            warnings.extend(response_warnings);
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn validate_questions(&self, questions: &[Question]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (i, q) in questions.iter().enumerate() {
            if !seen.insert(q.id) {
                errors.push(ValidationError::error(
                    format!("questions[{}].id", i),
                    format!("Duplicate question ID: {}", q.id),
                ));
            }
            if q.text.trim().is_empty() {
                errors.push(ValidationError::error(
                    format!("questions[{}].text", i),
                    "Question text is required",
                ));
            }
            if q.question_type == QuestionType::MultipleChoice
                && q.options.as_ref().map_or(0, |o| o.len()) < 2
            {
                errors.push(ValidationError::error(
                    format!("questions[{}].options", i),
                    "Multiple choice questions must have at least 2 options",
                ));
            }
            if !(0.0..=1.0).contains(&q.weight) {
                errors.push(ValidationError::error(
                    format!("questions[{}].weight", i),
                    "Question weight must be between 0 and 1",
                ));
            }
        }
        errors
    }

    fn validate_responses(
        &self,
        responses: &[Response],
        questions: &[Question],
    ) -> (Vec<ValidationError>, Vec<ValidationError>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

        let completion_rate = if questions.is_empty() {
            0.0
        } else {
            responses.len() as f64 / questions.len() as f64
        };
        if completion_rate < self.min_completion_rate {
            warnings.push(ValidationError::warning(
                "responses",
                format!(
                    "Only {:.1}% complete (minimum {:.1}% recommended)",
                    completion_rate * 100.0,
                    self.min_completion_rate * 100.0
                ),
            ));
        }

        let mut answered = HashSet::new();
        for (i, response) in responses.iter().enumerate() {
            let Some(question) = by_id.get(&response.question_id) else {
                errors.push(ValidationError::error(
                    format!("responses[{}].question_id", i),
                    format!("Question {} not found in assessment", response.question_id),
                ));
                continue;
            };

            if !answered.insert(response.question_id) {
                errors.push(ValidationError::error(
                    format!("responses[{}].question_id", i),
                    format!("Duplicate response for question {}", response.question_id),
                ));
            }

            if let Some(message) = answer_problem(&response.answer, question) {
                errors.push(ValidationError::error(format!("responses[{}].answer", i), message));
            }
        }
        (errors, warnings)
    }

    /// Confidence must lie in [0, 1] when supplied
    pub fn validate_confidence(&self, confidence: Option<f64>) -> Vec<ValidationError> {
        match confidence {
            Some(c) if !(0.0..=1.0).contains(&c) => vec![ValidationError::error(
                "confidence",
                "Confidence must be between 0 and 1",
            )],
            _ => Vec::new(),
        }
    }
}

impl Default for AssessmentValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn answer_problem(answer: &Value, question: &Question) -> Option<String> {
    if answer.is_null() {
        return Some("Answer cannot be null".to_string());
    }
    match question.question_type {
        QuestionType::MultipleChoice => match answer {
            Value::String(s) => match &question.options {
                Some(options) if !options.is_empty() && !options.contains(s) => {
                    Some(format!("Answer '{}' not in valid options", s))
                }
                _ => None,
            },
            _ => Some("Multiple choice answer must be a string".to_string()),
        },
        QuestionType::Scale => match answer.as_f64() {
            None => Some("Scale answer must be a number".to_string()),
            Some(v) if !(0.0..=100.0).contains(&v) => {
                Some("Scale answer must be between 0 and 100".to_string())
            }
            Some(_) => None,
        },
        QuestionType::Text if !answer.is_string() => {
            Some("Text answer must be a string".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn q(id: i64, question_type: QuestionType, options: Option<Vec<&str>>) -> Question {
        Question {
            id,
            text: format!("Question {}", id),
            question_type,
            options: options.map(|o| o.into_iter().map(String::from).collect()),
            category: "cognitive".into(),
            weight: 1.0,
        }
    }

    fn assessment(status: AssessmentStatus, responses: Vec<Response>) -> Assessment {
        Assessment {
            id: 1,
            title: "Team Fit".into(),
            description: None,
            version: "1.0.0".into(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            responses,
            results: None,
        }
    }

    fn five_scale_questions() -> Vec<Question> {
        (1..=5).map(|i| q(i, QuestionType::Scale, None)).collect()
    }

    fn resp(question_id: i64, answer: Value) -> Response {
        Response {
            id: question_id,
            assessment_id: 1,
            question_id,
            answer,
            confidence: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let draft = assessment(AssessmentStatus::Draft, vec![]);
        let result =
            AssessmentValidator::new().validate_assessment(&draft, &five_scale_questions());
        assert!(result.is_valid);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_too_few_questions_message() {
        let draft = assessment(AssessmentStatus::Draft, vec![]);
        let result =
            AssessmentValidator::new().validate_assessment(&draft, &five_scale_questions()[..2]);
        assert!(result.has_errors());
        assert_eq!(
            failure_message(&result.errors),
            "Validation failed: questions: Assessment must have at least 5 questions"
        );
    }

    #[test]
    fn test_question_problems() {
        let mut questions = five_scale_questions();
        questions.push(q(1, QuestionType::MultipleChoice, Some(vec!["only"])));
        questions[0].weight = 1.5;
        questions[1].text = "  ".into();

        let result = AssessmentValidator::new()
            .validate_assessment(&assessment(AssessmentStatus::Draft, vec![]), &questions);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "questions[0].weight",
                "questions[1].text",
                "questions[5].id",
                "questions[5].options"
            ]
        );
    }

    #[test]
    fn test_completed_responses_checked() {
        let mut questions = five_scale_questions();
        questions.push(q(6, QuestionType::MultipleChoice, Some(vec!["a", "b"])));
        questions.push(q(7, QuestionType::Text, None));
        let responses = vec![
            resp(1, json!(150)),
            resp(1, json!(50)),
            resp(6, json!("c")),
            resp(7, json!(3)),
            resp(42, json!(1)),
            resp(2, Value::Null),
        ];
        let result = AssessmentValidator::new()
            .validate_assessment(&assessment(AssessmentStatus::Completed, responses), &questions);

        let messages: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"Scale answer must be between 0 and 100"));
        assert!(messages.contains(&"Duplicate response for question 1"));
        assert!(messages.contains(&"Answer 'c' not in valid options"));
        assert!(messages.contains(&"Text answer must be a string"));
        assert!(messages.contains(&"Question 42 not found in assessment"));
        assert!(messages.contains(&"Answer cannot be null"));
        // 6 of 7 answered (85.7%) is above the completion threshold
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_completion_warning() {
        let responses = vec![resp(1, json!(10))];
        let completed = assessment(AssessmentStatus::Completed, responses);
        let result =
            AssessmentValidator::new().validate_assessment(&completed, &five_scale_questions());
        assert!(result.is_valid);
        assert_eq!(result.warnings[0].severity, Severity::Warning);
        assert_eq!(
            result.warnings[0].message,
            "Only 20.0% complete (minimum 80.0% recommended)"
        );
    }

    #[test]
    fn test_confidence_range() {
        let v = AssessmentValidator::new();
        assert!(v.validate_confidence(None).is_empty());
        assert!(v.validate_confidence(Some(0.5)).is_empty());
        assert_eq!(
            failure_message(&v.validate_confidence(Some(1.5))),
            "Validation failed: confidence: Confidence must be between 0 and 1"
        );
    }
}
