//! Composite scorer
//!
//! Individual scores are a weighted mean over named dimensions; team
//! scores blend the individual average with a team-dynamics score.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Team-level score; `Empty` when there are no individual scores
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TeamScore {
    Empty {
        team_score: f64,
        analysis: &'static str,
    },
    Scored {
        team_score: f64,
        individual_average: f64,
        team_dynamics: f64,
        variance: f64,
        cohesion: f64,
        size: usize,
    },
}

impl TeamScore {
    pub fn team_score(&self) -> f64 {
        match self {
            TeamScore::Empty { team_score, .. } | TeamScore::Scored { team_score, .. } => {
                *team_score
            }
        }
    }
}

pub struct CompositeScorer {
    dimension_weights: HashMap<String, f64>,
}

impl CompositeScorer {
    /// personality 1.0, skills 1.2, values 1.0, communication 1.1, leadership 0.9
    pub fn new() -> Self {
        Self::with_weights(HashMap::from([
            ("personality".to_string(), 1.0),
            ("skills".to_string(), 1.2),
            ("values".to_string(), 1.0),
            ("communication".to_string(), 1.1),
            ("leadership".to_string(), 0.9),
        ]))
    }

    pub fn with_weights(dimension_weights: HashMap<String, f64>) -> Self {
        Self { dimension_weights }
    }

    /// Weighted mean of dimension scores; unknown dimensions weigh 1.0
    pub fn composite(&self, dimension_scores: &BTreeMap<String, f64>) -> f64 {
        let (sum, total) = dimension_scores.iter().fold((0.0, 0.0), |(sum, total), (dim, score)| {
            let w = self.dimension_weights.get(dim).copied().unwrap_or(1.0);
            (sum + score * w, total + w)
        });
        if total > 0.0 {
            sum / total
        } else {
            0.0
        }
    }

    /// `0.6 * mean(individual) + 0.4 * dynamics`, with population variance and cohesion
    pub fn team_score(&self, individual: &[f64], team_dynamics: f64) -> TeamScore {
        if individual.is_empty() {
            return TeamScore::Empty {
                team_score: 0.0,
                analysis: "No data",
            };
        }
        let n = individual.len() as f64;
        let avg = individual.iter().sum::<f64>() / n;
        let variance = individual.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / n;

        TeamScore::Scored {
            team_score: avg * 0.6 + team_dynamics * 0.4,
            individual_average: avg,
            team_dynamics,
            variance,
            cohesion: 100.0 - variance.min(100.0),
            size: individual.len(),
        }
    }
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_weighted_mean() {
        let scores = BTreeMap::from([
            ("skills".to_string(), 80.0),
            ("leadership".to_string(), 60.0),
        ]);
        let expected = (80.0 * 1.2 + 60.0 * 0.9) / 2.1;
        assert!((CompositeScorer::new().composite(&scores) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_composite_empty_and_unknown() {
        let scorer = CompositeScorer::new();
        assert_eq!(scorer.composite(&BTreeMap::new()), 0.0);
        let scores = BTreeMap::from([("curiosity".to_string(), 42.0)]);
        assert_eq!(scorer.composite(&scores), 42.0);
    }

    #[test]
    fn test_team_score() {
        let score = CompositeScorer::new().team_score(&[70.0, 90.0], 50.0);
        match score {
            TeamScore::Scored {
                team_score,
                variance,
                cohesion,
                size,
                ..
            } => {
                assert!((team_score - 68.0).abs() < 1e-9);
                assert_eq!(variance, 100.0);
                assert_eq!(cohesion, 0.0);
                assert_eq!(size, 2);
            }
            TeamScore::Empty { .. } => panic!("expected scored team"),
        }
    }

    #[test]
    fn test_team_score_empty_json() {
        let json = serde_json::to_value(CompositeScorer::new().team_score(&[], 80.0)).unwrap();
        assert_eq!(json, serde_json::json!({"team_score": 0.0, "analysis": "No data"}));
    }
}
