//! HTTP API handlers for Team Alchemy

pub mod analysis;
pub mod archetypes;
pub mod assessments;
pub mod auth;
pub mod buildinfo;
pub mod health;
pub mod intelligence;
pub mod jobs;
pub mod psychology;
pub mod teams;
pub mod users;

pub use analysis::analysis_routes;
pub use archetypes::archetype_routes;
pub use assessments::assessment_routes;
pub use auth::auth_middleware;
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use intelligence::intelligence_routes;
pub use jobs::job_routes;
pub use psychology::psychology_routes;
pub use teams::team_routes;
pub use users::user_routes;
