//! Team Alchemy domain engine
//!
//! Pure, synchronous logic shared by the HTTP service and the CLI:
//! archetype classification, trait profiles, MBTI/Jungian mapping,
//! assessment scoring and validation, depth-psychology analyzers,
//! case studies, composite scoring, interventions, team optimization
//! and performance prediction.
//!
//! Nothing in this crate touches the database or the network.

pub mod archetypes;
pub mod assessment;
pub mod intelligence;
pub mod intervention;
pub mod metrics;
pub mod psychology;
pub mod scoring;

pub use archetypes::{
    ArchetypeClassifier, ArchetypeType, ClassificationResult, JungianMapper, MbtiType,
    TraitProfile,
};
