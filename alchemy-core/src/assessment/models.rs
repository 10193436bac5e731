//! Assessment data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Scale,
    Text,
    Ranking,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Scale => "scale",
            QuestionType::Text => "text",
            QuestionType::Ranking => "ranking",
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "scale" => Ok(QuestionType::Scale),
            "text" => Ok(QuestionType::Text),
            "ranking" => Ok(QuestionType::Ranking),
            other => Err(format!("Unknown question type: {}", other)),
        }
    }
}

/// Lifecycle: draft → in_progress → completed → analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    InProgress,
    Completed,
    Analyzed,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "draft",
            AssessmentStatus::InProgress => "in_progress",
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::Analyzed => "analyzed",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(AssessmentStatus::Draft),
            "in_progress" => Ok(AssessmentStatus::InProgress),
            "completed" => Ok(AssessmentStatus::Completed),
            "analyzed" => Ok(AssessmentStatus::Analyzed),
            other => Err(format!("Unknown assessment status: {}", other)),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Question as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionInput {
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub category: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl QuestionInput {
    /// Field-level checks; returns one message per violation
    pub fn field_errors(&self, index: usize) -> Vec<String> {
        let mut errors = Vec::new();
        let len = self.text.chars().count();
        if len == 0 || len > 1000 {
            errors.push(format!(
                "questions[{}].text: must be between 1 and 1000 characters",
                index
            ));
        }
        if !(0.0..=1.0).contains(&self.weight) {
            errors.push(format!("questions[{}].weight: must be between 0 and 1", index));
        }
        if self.question_type == QuestionType::MultipleChoice
            && self.options.as_ref().map_or(true, |o| o.is_empty())
        {
            errors.push(format!(
                "questions[{}].options: Multiple choice questions must have options",
                index
            ));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    pub category: String,
    pub weight: f64,
}

/// Answer submitted for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseInput {
    pub question_id: i64,
    #[serde(default)]
    pub answer: Value,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: i64,
    pub assessment_id: i64,
    pub question_id: i64,
    pub answer: Value,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

impl AssessmentCreate {
    /// Field-level checks (lengths and ranges) on the payload
    pub fn field_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let len = self.title.chars().count();
        if len == 0 || len > 200 {
            errors.push("title: must be between 1 and 200 characters".to_string());
        }
        for (i, q) in self.questions.iter().enumerate() {
            errors.extend(q.field_errors(i));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub version: String,
    pub status: AssessmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub responses: Vec<Response>,
    pub results: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_defaults() {
        let create: AssessmentCreate = serde_json::from_value(json!({
            "title": "Team Fit",
            "questions": [{"text": "Q", "question_type": "scale", "category": "cognitive"}]
        }))
        .unwrap();
        assert_eq!(create.version, "1.0.0");
        assert_eq!(create.questions[0].weight, 1.0);
        assert!(create.field_errors().is_empty());
    }

    #[test]
    fn test_field_errors() {
        let create = AssessmentCreate {
            title: String::new(),
            description: None,
            version: default_version(),
            questions: vec![QuestionInput {
                text: "Pick".into(),
                question_type: QuestionType::MultipleChoice,
                options: None,
                category: "behavioral".into(),
                weight: 2.0,
            }],
        };
        let errors = create.field_errors();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("title"));
    }

    #[test]
    fn test_status_round_trip_names() {
        assert_eq!(
            "in_progress".parse::<AssessmentStatus>().unwrap(),
            AssessmentStatus::InProgress
        );
        assert_eq!(AssessmentStatus::Analyzed.as_str(), "analyzed");
        assert!("done".parse::<AssessmentStatus>().is_err());
    }
}
