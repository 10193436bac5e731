//! Team composition optimizer
//!
//! Scores a team on archetype diversity and pairwise compatibility, then
//! greedily assembles teams from a candidate pool.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub archetype: String,
    /// Other candidate id → compatibility (0-100)
    #[serde(default)]
    pub compatibility_scores: BTreeMap<i64, f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TeamScoreBreakdown {
    pub diversity: f64,
    pub compatibility: f64,
    pub size: usize,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationMetrics {
    pub skill_coverage: f64,
    pub diversity: f64,
    pub compatibility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub team_composition: Vec<i64>,
    pub score: f64,
    pub metrics: OptimizationMetrics,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub candidate_id: i64,
    pub name: String,
    pub impact_score: f64,
    pub rationale: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TeamOptimizer;

impl TeamOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Diversity (0-100), mean pairwise compatibility, and
    /// `overall = diversity_ratio * 50 + compatibility * 0.5`
    pub fn team_score(&self, team: &[&Candidate]) -> TeamScoreBreakdown {
        if team.is_empty() {
            return TeamScoreBreakdown::default();
        }
        let archetypes: HashSet<&str> = team.iter().map(|m| m.archetype.as_str()).collect();
        let ratio = archetypes.len() as f64 / team.len() as f64;
        let compatibility = mean_compatibility(team);

        TeamScoreBreakdown {
            diversity: ratio * 100.0,
            compatibility,
            size: team.len(),
            overall: ratio * 50.0 + compatibility * 0.5,
        }
    }

    /// Greedy: each slot takes the candidate that most raises `overall`
    pub fn optimize(&self, candidates: &[Candidate], team_size: usize) -> OptimizationResult {
        let mut selected: Vec<&Candidate> = Vec::new();
        let mut remaining: Vec<&Candidate> = candidates.iter().collect();

        while selected.len() < team_size && !remaining.is_empty() {
            let mut best: Option<(usize, f64)> = None;
            for (idx, candidate) in remaining.iter().enumerate() {
                let mut trial = selected.clone();
                trial.push(*candidate);
                let overall = self.team_score(&trial).overall;
                // strict: earlier candidates win ties
                if best.map_or(true, |(_, b)| overall > b) {
                    best = Some((idx, overall));
                }
            }
            match best {
                Some((idx, _)) => selected.push(remaining.remove(idx)),
                None => break,
            }
        }

        let score = self.team_score(&selected);
        let pool_skills: HashSet<&str> = candidates
            .iter()
            .flat_map(|c| c.skills.iter().map(String::as_str))
            .collect();
        let team_skills: HashSet<&str> = selected
            .iter()
            .flat_map(|c| c.skills.iter().map(String::as_str))
            .collect();
        let skill_coverage = if pool_skills.is_empty() {
            0.0
        } else {
            team_skills.len() as f64 / pool_skills.len() as f64
        };

        let metrics = OptimizationMetrics {
            skill_coverage,
            diversity: score.diversity / 100.0,
            compatibility: score.compatibility / 100.0,
        };
        let recommendations = optimization_advice(&metrics);

        OptimizationResult {
            team_composition: selected.iter().map(|c| c.id).collect(),
            score: score.overall,
            metrics,
            recommendations,
        }
    }

    /// Candidates ranked by how much they raise the team's `overall`
    pub fn suggest_additions(
        &self,
        team: &[Candidate],
        candidates: &[Candidate],
        max: usize,
    ) -> Vec<Suggestion> {
        let current: Vec<&Candidate> = team.iter().collect();
        let baseline = self.team_score(&current).overall;
        let present: HashSet<&str> = team.iter().map(|m| m.archetype.as_str()).collect();
        let member_ids: HashSet<i64> = team.iter().map(|m| m.id).collect();

        let mut suggestions: Vec<Suggestion> = candidates
            .iter()
            .filter(|c| !member_ids.contains(&c.id))
            .map(|c| {
                let mut trial = current.clone();
                trial.push(c);
                let impact = self.team_score(&trial).overall - baseline;
                let rationale = if present.contains(c.archetype.as_str()) {
                    format!("Strengthens existing archetype: {}", c.archetype)
                } else {
                    format!("Adds missing archetype: {}", c.archetype)
                };
                Suggestion {
                    candidate_id: c.id,
                    name: c.name.clone(),
                    impact_score: impact,
                    rationale,
                }
            })
            .collect();

        suggestions.sort_by(|a, b| b.impact_score.total_cmp(&a.impact_score));
        suggestions.truncate(max);
        suggestions
    }
}

/// Mean of the pairwise scores either member recorded for the other
fn mean_compatibility(team: &[&Candidate]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (i, a) in team.iter().enumerate() {
        for b in &team[i + 1..] {
            let score = a
                .compatibility_scores
                .get(&b.id)
                .or_else(|| b.compatibility_scores.get(&a.id));
            if let Some(s) = score {
                total += s;
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn optimization_advice(metrics: &OptimizationMetrics) -> Vec<String> {
    let mut advice = Vec::new();
    if metrics.diversity < 0.5 {
        advice.push("Consider adding more diverse archetypes".to_string());
    }
    if metrics.skill_coverage < 0.8 {
        advice.push("Balance skill levels across team".to_string());
    }
    if metrics.compatibility < 0.6 {
        advice.push("Invest in team-building to improve compatibility".to_string());
    }
    if advice.is_empty() {
        advice.push("Team composition is well balanced".to_string());
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, archetype: &str, skills: &[&str], compat: &[(i64, f64)]) -> Candidate {
        Candidate {
            id,
            name: format!("Member {}", id),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            archetype: archetype.to_string(),
            compatibility_scores: compat.iter().copied().collect(),
        }
    }

    #[test]
    fn test_team_score() {
        let a = candidate(1, "leader", &[], &[(2, 80.0), (3, 60.0)]);
        let b = candidate(2, "analyst", &[], &[]);
        let c = candidate(3, "leader", &[], &[(2, 70.0)]);
        let score = TeamOptimizer::new().team_score(&[&a, &b, &c]);
        assert!((score.diversity - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(score.compatibility, 70.0);
        assert_eq!(score.size, 3);
        assert!((score.overall - (2.0 / 3.0 * 50.0 + 35.0)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_team_scores_zero() {
        assert_eq!(TeamOptimizer::new().team_score(&[]), TeamScoreBreakdown::default());
    }

    #[test]
    fn test_optimize_prefers_diverse_compatible() {
        let pool = vec![
            candidate(1, "leader", &["rust"], &[(2, 20.0), (3, 90.0)]),
            candidate(2, "leader", &["go"], &[]),
            candidate(3, "analyst", &["sql"], &[]),
        ];
        let result = TeamOptimizer::new().optimize(&pool, 2);
        assert_eq!(result.team_composition, vec![1, 3]);
        assert!((result.score - 95.0).abs() < 1e-9);
        assert!((result.metrics.skill_coverage - 2.0 / 3.0).abs() < 1e-9);
        assert!(result
            .recommendations
            .contains(&"Balance skill levels across team".to_string()));
    }

    #[test]
    fn test_optimize_size_larger_than_pool() {
        let pool = vec![candidate(1, "leader", &[], &[])];
        let result = TeamOptimizer::new().optimize(&pool, 5);
        assert_eq!(result.team_composition, vec![1]);
    }

    #[test]
    fn test_suggest_additions() {
        let team = vec![candidate(1, "leader", &[], &[(2, 50.0), (3, 50.0)])];
        let pool = vec![
            candidate(1, "leader", &[], &[]),
            candidate(2, "leader", &[], &[]),
            candidate(3, "harmonizer", &[], &[]),
        ];
        let suggestions = TeamOptimizer::new().suggest_additions(&team, &pool, 3);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].candidate_id, 3);
        assert_eq!(suggestions[0].rationale, "Adds missing archetype: harmonizer");
        assert_eq!(suggestions[1].rationale, "Strengthens existing archetype: leader");
    }
}
