//! Depth-psychology analyzers and the case-study library

pub mod case_studies;
pub mod freudian;
pub mod jungian;
pub mod shadow_work;

pub use case_studies::{CaseStudy, CaseStudyDetail, CaseStudyMapper, CaseStudySummary};
pub use freudian::{
    analyze_conflict_patterns, ConflictAnalysis, DefenseMechanism, DefenseProfile, FreudianAnalyzer,
};
pub use jungian::{
    collective_patterns, ArchetypalPattern, CollectivePatterns, IndividuationProgress,
    JungianAnalyzer, JungianArchetype,
};
pub use shadow_work::{
    exercises, team_shadow_dynamics, IntegrationStatus, ShadowAspect, ShadowElement,
    ShadowWorkAnalyzer, ShadowWorkPlan,
};
