//! Team optimization and heuristic performance prediction

pub mod optimizer;
pub mod predictor;

pub use optimizer::{
    Candidate, OptimizationMetrics, OptimizationResult, Suggestion, TeamOptimizer,
    TeamScoreBreakdown,
};
pub use predictor::{IndividualProfile, PerformancePredictor, PredictionResult, TeamProfile};
