//! Team interventions: recommendations and action plans

pub mod action_plans;
pub mod recommendations;

pub use action_plans::{ActionItem, ActionPlan, ActionPlanGenerator, ItemStatus, PlanProgress};
pub use recommendations::{
    Effort, Recommendation, RecommendationEngine, RecommendationType, TeamHealthMetrics,
    DEFAULT_MAX_RECOMMENDATIONS,
};
