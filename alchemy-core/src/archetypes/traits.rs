//! Personality traits and trait profiles

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Trait validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraitError {
    #[error("Trait weight must be between 0 and 1")]
    WeightOutOfRange(f64),

    #[error("Trait score must be between 0 and 100")]
    ScoreOutOfRange { name: String, score: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitCategory {
    Cognitive,
    Emotional,
    Behavioral,
    Interpersonal,
    Motivational,
}

impl TraitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraitCategory::Cognitive => "cognitive",
            TraitCategory::Emotional => "emotional",
            TraitCategory::Behavioral => "behavioral",
            TraitCategory::Interpersonal => "interpersonal",
            TraitCategory::Motivational => "motivational",
        }
    }
}

/// A single named trait measured on a low..high scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    pub category: TraitCategory,
    pub description: String,
    pub scale_low: String,
    pub scale_high: String,
    pub weight: f64,
}

impl Trait {
    /// Create a trait, rejecting weights outside [0, 1]
    pub fn new(
        name: impl Into<String>,
        category: TraitCategory,
        description: impl Into<String>,
        scale_low: impl Into<String>,
        scale_high: impl Into<String>,
        weight: f64,
    ) -> Result<Self, TraitError> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(TraitError::WeightOutOfRange(weight));
        }
        Ok(Self {
            name: name.into(),
            category,
            description: description.into(),
            scale_low: scale_low.into(),
            scale_high: scale_high.into(),
            weight,
        })
    }
}

/// Trait name → score (0-100) for one individual
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitProfile {
    scores: BTreeMap<String, f64>,
}

impl TraitProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from a map, validating every score
    pub fn from_scores<I, K>(scores: I) -> Result<Self, TraitError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut profile = Self::new();
        for (name, score) in scores {
            profile.add_score(name, score)?;
        }
        Ok(profile)
    }

    /// Add or update a trait score
    pub fn add_score(&mut self, name: impl Into<String>, score: f64) -> Result<(), TraitError> {
        let name = name.into();
        if !(0.0..=100.0).contains(&score) {
            return Err(TraitError::ScoreOutOfRange { name, score });
        }
        self.scores.insert(name, score);
        Ok(())
    }

    /// Insert a score after clamping it into [0, 100]
    pub fn set_clamped(&mut self, name: impl Into<String>, score: f64) {
        self.scores.insert(name.into(), score.clamp(0.0, 100.0));
    }

    pub fn score(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied()
    }

    pub fn scores(&self) -> &BTreeMap<String, f64> {
        &self.scores
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Traits used by the standard assessments
pub fn standard_traits() -> Vec<Trait> {
    let rows: [(&str, TraitCategory, &str, &str, &str); 8] = [
        (
            "Extraversion",
            TraitCategory::Interpersonal,
            "Tendency to seek stimulation from the external world",
            "Introverted",
            "Extraverted",
        ),
        (
            "Analytical Thinking",
            TraitCategory::Cognitive,
            "Preference for logical and systematic analysis",
            "Intuitive",
            "Analytical",
        ),
        (
            "Decisiveness",
            TraitCategory::Behavioral,
            "Speed and firmness in reaching decisions",
            "Deliberative",
            "Decisive",
        ),
        (
            "Confidence",
            TraitCategory::Emotional,
            "Trust in one's own judgement and abilities",
            "Reserved",
            "Self-assured",
        ),
        (
            "Detail Orientation",
            TraitCategory::Cognitive,
            "Attention to accuracy and small particulars",
            "Big-picture",
            "Meticulous",
        ),
        (
            "Creativity",
            TraitCategory::Cognitive,
            "Generation of novel ideas and approaches",
            "Conventional",
            "Inventive",
        ),
        (
            "Empathy",
            TraitCategory::Interpersonal,
            "Sensitivity to the feelings of others",
            "Detached",
            "Empathetic",
        ),
        (
            "Achievement Drive",
            TraitCategory::Motivational,
            "Motivation to reach ambitious goals",
            "Content",
            "Driven",
        ),
    ];

    rows.into_iter()
        .map(|(name, category, description, low, high)| Trait {
            name: name.to_string(),
            category,
            description: description.to_string(),
            scale_low: low.to_string(),
            scale_high: high.to_string(),
            weight: 1.0,
        })
        .collect()
}

/// Compatibility (0-100) between two profiles
///
/// Mean absolute difference over the traits both profiles share,
/// inverted onto 0-100. Profiles sharing no traits score a neutral 50.
pub fn trait_compatibility(a: &TraitProfile, b: &TraitProfile) -> f64 {
    let diffs: Vec<f64> = a
        .scores
        .iter()
        .filter_map(|(name, score)| b.score(name).map(|other| (score - other).abs()))
        .collect();

    if diffs.is_empty() {
        return 50.0;
    }

    let avg = diffs.iter().sum::<f64>() / diffs.len() as f64;
    (100.0 - avg).max(0.0)
}
