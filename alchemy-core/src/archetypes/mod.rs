//! Archetypes, traits and MBTI mapping

pub mod classifier;
pub mod definitions;
pub mod jungian_mapper;
pub mod traits;

pub use classifier::{ArchetypeClassifier, ClassificationResult, TeamComposition};
pub use definitions::{
    definition, definitions, ArchetypeDefinition, ArchetypeType, UnknownArchetype,
};
pub use jungian_mapper::{
    JungianFunction, JungianMapper, JungianProfile, MbtiType, ProfileError, TypeCompatibility,
};
pub use traits::{
    standard_traits, trait_compatibility, Trait, TraitCategory, TraitError, TraitProfile,
};
