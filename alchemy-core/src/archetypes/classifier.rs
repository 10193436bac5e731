//! Archetype classifier
//!
//! Scores a trait profile against a reference pattern per archetype and
//! picks the closest matches.

use super::definitions::ArchetypeType;
use super::traits::TraitProfile;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of classifying one profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub primary_archetype: ArchetypeType,
    pub secondary_archetype: Option<ArchetypeType>,
    /// Primary match score / 100, in [0, 1]
    pub confidence: f64,
    pub trait_scores: BTreeMap<String, f64>,
}

/// Archetype composition of a group of profiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamComposition {
    pub team_size: usize,
    pub archetype_distribution: BTreeMap<ArchetypeType, usize>,
    pub classifications: Vec<ClassificationResult>,
    pub diversity_score: f64,
}

/// Pattern-matching archetype classifier
pub struct ArchetypeClassifier {
    patterns: Vec<(ArchetypeType, Vec<(&'static str, f64)>)>,
}

impl ArchetypeClassifier {
    pub fn new() -> Self {
        let patterns = vec![
            (
                ArchetypeType::Leader,
                vec![("Extraversion", 80.0), ("Decisiveness", 85.0), ("Confidence", 90.0)],
            ),
            (
                ArchetypeType::Innovator,
                vec![("Creativity", 90.0), ("Openness", 85.0), ("Risk Tolerance", 75.0)],
            ),
            (
                ArchetypeType::Harmonizer,
                vec![("Empathy", 90.0), ("Agreeableness", 85.0), ("Conflict Resolution", 80.0)],
            ),
            (
                ArchetypeType::Analyst,
                vec![
                    ("Analytical Thinking", 90.0),
                    ("Detail Orientation", 85.0),
                    ("Logical Reasoning", 88.0),
                ],
            ),
            (
                ArchetypeType::Implementer,
                vec![("Conscientiousness", 90.0), ("Reliability", 88.0), ("Organization", 85.0)],
            ),
            (
                ArchetypeType::Visionary,
                vec![("Strategic Thinking", 90.0), ("Intuition", 85.0), ("Creativity", 80.0)],
            ),
            (
                ArchetypeType::Collaborator,
                vec![("Teamwork", 90.0), ("Communication", 85.0), ("Agreeableness", 80.0)],
            ),
            (
                ArchetypeType::Specialist,
                vec![("Expertise", 92.0), ("Detail Orientation", 85.0), ("Focus", 88.0)],
            ),
        ];
        Self { patterns }
    }

    /// Match score (0-100) of every archetype, in declaration order
    pub fn archetype_scores(&self, profile: &TraitProfile) -> Vec<(ArchetypeType, f64)> {
        self.patterns
            .iter()
            .map(|(archetype, pattern)| (*archetype, pattern_match(profile, pattern)))
            .collect()
    }

    /// Classify one profile
    pub fn classify(&self, profile: &TraitProfile) -> ClassificationResult {
        let mut scores = self.archetype_scores(profile);
        // Stable: equal scores keep declaration order
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));

        let (primary, top) = scores
            .first()
            .copied()
            .unwrap_or((ArchetypeType::Leader, 0.0));
        let secondary = scores.get(1).map(|(t, _)| *t);

        ClassificationResult {
            primary_archetype: primary,
            secondary_archetype: secondary,
            confidence: (top / 100.0).clamp(0.0, 1.0),
            trait_scores: profile.scores().clone(),
        }
    }

    /// Classify every profile and summarise the group
    pub fn classify_team(&self, profiles: &[TraitProfile]) -> TeamComposition {
        let mut distribution: BTreeMap<ArchetypeType, usize> = BTreeMap::new();
        let classifications: Vec<ClassificationResult> = profiles
            .iter()
            .map(|p| {
                let result = self.classify(p);
                *distribution.entry(result.primary_archetype).or_insert(0) += 1;
                result
            })
            .collect();

        TeamComposition {
            team_size: profiles.len(),
            diversity_score: distribution.len() as f64 / ArchetypeType::ALL.len() as f64 * 100.0,
            archetype_distribution: distribution,
            classifications,
        }
    }
}

impl Default for ArchetypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// `max(0, 100 - mean |expected - actual|)` over pattern traits present in the profile
fn pattern_match(profile: &TraitProfile, pattern: &[(&'static str, f64)]) -> f64 {
    let diffs: Vec<f64> = pattern
        .iter()
        .filter_map(|(name, expected)| profile.score(name).map(|actual| (expected - actual).abs()))
        .collect();

    if diffs.is_empty() {
        return 0.0;
    }
    let avg = diffs.iter().sum::<f64>() / diffs.len() as f64;
    (100.0 - avg).max(0.0)
}
