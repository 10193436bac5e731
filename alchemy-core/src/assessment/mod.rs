//! Assessments: data model, scoring and validation

pub mod calculator;
pub mod models;
pub mod validator;

pub use calculator::{team_aggregate, AssessmentCalculator, AssessmentScore, TeamAggregate};
pub use models::{
    Assessment, AssessmentCreate, AssessmentStatus, Question, QuestionInput, QuestionType, Response,
    ResponseInput,
};
pub use validator::{
    failure_message, AssessmentValidator, Severity, ValidationError, ValidationResult,
};
