//! Heuristic performance predictor
//!
//! A fixed linear model over team features; individual fit is scored
//! from archetype, skill and value overlap with the team.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub predicted_value: f64,
    pub confidence: f64,
    pub factors: BTreeMap<String, f64>,
    pub recommendations: Vec<String>,
}

/// Who is being fitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualProfile {
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
}

/// What the team already has
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    #[serde(default)]
    pub archetypes: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
}

const FEATURE_WEIGHTS: [(&str, f64); 4] = [
    ("team_size", 0.1),
    ("archetype_diversity", 0.3),
    ("skill_coverage", 0.3),
    ("avg_compatibility", 0.3),
];

/// Neutral value used when a factor has nothing to compare
const NEUTRAL: f64 = 0.5;
const DEFAULT_VALUE_ALIGNMENT: f64 = 0.6;

#[derive(Debug, Default, Clone, Copy)]
pub struct PerformancePredictor;

impl PerformancePredictor {
    pub fn new() -> Self {
        Self
    }

    /// `100 * Σ feature * weight`; unknown features are ignored
    pub fn predict_team_performance(&self, features: &BTreeMap<String, f64>) -> PredictionResult {
        let score: f64 = FEATURE_WEIGHTS
            .iter()
            .filter_map(|(name, weight)| features.get(*name).map(|v| v * weight))
            .sum();

        PredictionResult {
            predicted_value: score * 100.0,
            confidence: 0.75,
            factors: FEATURE_WEIGHTS
                .iter()
                .map(|(name, weight)| (name.to_string(), *weight))
                .collect(),
            recommendations: vec![
                "Increase archetype diversity for better performance".to_string(),
                "Ensure comprehensive skill coverage".to_string(),
            ],
        }
    }

    pub fn predict_individual_fit(
        &self,
        individual: &IndividualProfile,
        team: &TeamProfile,
    ) -> PredictionResult {
        let archetype_match = match &individual.archetype {
            Some(a) if team.archetypes.iter().any(|t| t.eq_ignore_ascii_case(a)) => NEUTRAL,
            Some(_) => 1.0,
            None => NEUTRAL,
        };

        let team_skills: HashSet<String> = team.skills.iter().map(|s| s.to_lowercase()).collect();
        let skill_complement = if individual.skills.is_empty() {
            NEUTRAL
        } else {
            let new = individual
                .skills
                .iter()
                .filter(|s| !team_skills.contains(&s.to_lowercase()))
                .count();
            new as f64 / individual.skills.len() as f64
        };

        let value_alignment =
            jaccard(&individual.values, &team.values).unwrap_or(DEFAULT_VALUE_ALIGNMENT);

        let mut recommendations = Vec::new();
        recommendations.push(if archetype_match > NEUTRAL {
            "Adds an archetype the team is missing".to_string()
        } else {
            "Archetype already represented on the team".to_string()
        });
        if skill_complement >= NEUTRAL {
            recommendations.push("Brings complementary skills".to_string());
        } else {
            recommendations.push("Skills largely overlap with the team".to_string());
        }
        recommendations.push("Consider culture fit".to_string());

        let factors = BTreeMap::from([
            ("archetype_match".to_string(), archetype_match),
            ("skill_complement".to_string(), skill_complement),
            ("value_alignment".to_string(), value_alignment),
        ]);
        let predicted = factors.values().sum::<f64>() / factors.len() as f64 * 100.0;

        PredictionResult {
            predicted_value: predicted,
            confidence: 0.7,
            factors,
            recommendations,
        }
    }
}

/// Case-insensitive set overlap; `None` when either side is empty
fn jaccard(a: &[String], b: &[String]) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let a: HashSet<String> = a.iter().map(|s| s.to_lowercase()).collect();
    let b: HashSet<String> = b.iter().map(|s| s.to_lowercase()).collect();
    let union = a.union(&b).count();
    Some(a.intersection(&b).count() as f64 / union as f64)
}
