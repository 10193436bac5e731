//! Recommendation engine
//!
//! Maps team-health metrics onto groups of templated recommendations.
//! Each group fires when its metric crosses a threshold; the combined list
//! is ordered by priority and truncated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    TeamComposition,
    Communication,
    Process,
    SkillDevelopment,
    ConflictResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    /// 1-5, 5 highest
    pub priority: u8,
    /// 0-1
    pub expected_impact: f64,
    pub implementation_effort: Effort,
}

/// Team-health inputs; absent values never trigger their group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamHealthMetrics {
    #[serde(default)]
    pub diversity_score: Option<f64>,
    #[serde(default)]
    pub communication_score: Option<f64>,
    #[serde(default)]
    pub conflict_score: Option<f64>,
    #[serde(default)]
    pub skill_gap_score: Option<f64>,
    #[serde(default)]
    pub process_score: Option<f64>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub burnout_risk: Option<f64>,
}

struct Template {
    kind: RecommendationType,
    title: &'static str,
    description: &'static str,
    priority: u8,
    impact: f64,
    effort: Effort,
}

impl Template {
    fn build(&self) -> Recommendation {
        Recommendation {
            kind: self.kind,
            title: self.title.to_string(),
            description: self.description.to_string(),
            priority: self.priority,
            expected_impact: self.impact,
            implementation_effort: self.effort,
        }
    }
}

const fn t(
    kind: RecommendationType,
    title: &'static str,
    description: &'static str,
    priority: u8,
    impact: f64,
    effort: Effort,
) -> Template {
    Template {
        kind,
        title,
        description,
        priority,
        impact,
        effort,
    }
}

use Effort::{High, Low, Medium};
use RecommendationType::*;

const LOW_DIVERSITY: &[Template] = &[
    t(
        TeamComposition,
        "Increase Team Diversity",
        "Add members with different archetypes to improve team dynamics and problem-solving capabilities",
        4,
        0.7,
        Medium,
    ),
    t(
        TeamComposition,
        "Balance Thinking Styles",
        "Recruit members with complementary cognitive approaches (analytical vs. creative, detail-oriented vs. big-picture)",
        3,
        0.65,
        Medium,
    ),
];

const POOR_COMMUNICATION: &[Template] = &[
    t(
        Communication,
        "Implement Daily Standups",
        "Regular 15-minute check-ins to improve information flow and identify blockers early",
        5,
        0.8,
        Low,
    ),
    t(
        Communication,
        "Establish Communication Protocols",
        "Define clear channels for different types of communication (urgent, updates, discussions)",
        4,
        0.75,
        Low,
    ),
    t(
        Communication,
        "Implement Async Communication Tools",
        "Use collaborative documentation and async communication to accommodate different time zones and work styles",
        3,
        0.7,
        Low,
    ),
];

const HIGH_CONFLICT: &[Template] = &[
    t(
        ConflictResolution,
        "Facilitate Team Mediation Sessions",
        "Organize structured conflict resolution sessions with neutral facilitator",
        5,
        0.85,
        Medium,
    ),
    t(
        ConflictResolution,
        "Establish Ground Rules",
        "Create and enforce team agreements on respectful communication and collaboration",
        4,
        0.7,
        Low,
    ),
];

const SKILL_GAPS: &[Template] = &[
    t(
        SkillDevelopment,
        "Create Skill Development Plan",
        "Identify critical skill gaps and create targeted training programs",
        4,
        0.75,
        Medium,
    ),
    t(
        SkillDevelopment,
        "Implement Peer Learning",
        "Establish mentoring pairs and knowledge sharing sessions",
        3,
        0.65,
        Low,
    ),
    t(
        SkillDevelopment,
        "Cross-Training Program",
        "Enable team members to learn adjacent skills to increase flexibility",
        3,
        0.6,
        Medium,
    ),
];

const POOR_PROCESSES: &[Template] = &[
    t(
        Process,
        "Implement Agile Ceremonies",
        "Adopt sprint planning, retrospectives, and reviews for continuous improvement",
        4,
        0.8,
        Medium,
    ),
    t(
        Process,
        "Document Standard Operating Procedures",
        "Create clear documentation for recurring tasks and workflows",
        3,
        0.7,
        Medium,
    ),
    t(
        Process,
        "Automate Repetitive Tasks",
        "Identify and automate manual processes to free up team capacity",
        3,
        0.65,
        High,
    ),
];

const LOW_ENGAGEMENT: &[Template] = &[
    t(
        TeamComposition,
        "Increase Team Autonomy",
        "Empower team members with decision-making authority in their areas of expertise",
        4,
        0.75,
        Low,
    ),
    t(
        Process,
        "Regular Recognition Program",
        "Implement peer recognition and celebrate team achievements",
        3,
        0.7,
        Low,
    ),
];

const BURNOUT_RISK: &[Template] = &[
    t(
        Process,
        "Workload Balancing",
        "Redistribute tasks and set realistic deadlines to prevent overwork",
        5,
        0.85,
        Medium,
    ),
    t(
        TeamComposition,
        "Add Team Capacity",
        "Hire additional team members or contractors to reduce individual workload",
        4,
        0.8,
        High,
    ),
];

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Default, Clone, Copy)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, metrics: &TeamHealthMetrics, max: usize) -> Vec<Recommendation> {
        let below = |v: Option<f64>, limit: f64| v.is_some_and(|v| v < limit);
        let above = |v: Option<f64>, limit: f64| v.is_some_and(|v| v > limit);

        let groups: [(bool, &[Template]); 7] = [
            (below(metrics.diversity_score, 50.0), LOW_DIVERSITY),
            (below(metrics.communication_score, 60.0), POOR_COMMUNICATION),
            (above(metrics.conflict_score, 70.0), HIGH_CONFLICT),
            (above(metrics.skill_gap_score, 40.0), SKILL_GAPS),
            (below(metrics.process_score, 60.0), POOR_PROCESSES),
            (below(metrics.engagement_score, 50.0), LOW_ENGAGEMENT),
            (above(metrics.burnout_risk, 60.0), BURNOUT_RISK),
        ];

        let mut recommendations: Vec<Recommendation> = groups
            .iter()
            .filter(|(fired, _)| *fired)
            .flat_map(|(_, templates)| templates.iter().map(Template::build))
            .collect();

        // Stable: equal priorities keep group order
        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
        recommendations.truncate(max);
        recommendations
    }

    /// Low effort and impact above 0.6
    pub fn quick_wins(&self, recommendations: &[Recommendation]) -> Vec<Recommendation> {
        recommendations
            .iter()
            .filter(|r| r.implementation_effort == Effort::Low && r.expected_impact > 0.6)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_team_gets_nothing() {
        let recs = RecommendationEngine::new().generate(&TeamHealthMetrics::default(), 5);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_poor_communication_ordering() {
        let metrics = TeamHealthMetrics {
            communication_score: Some(40.0),
            diversity_score: Some(30.0),
            ..Default::default()
        };
        let recs = RecommendationEngine::new().generate(&metrics, 10);
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Implement Daily Standups",
                "Increase Team Diversity",
                "Establish Communication Protocols",
                "Balance Thinking Styles",
                "Implement Async Communication Tools",
            ]
        );
    }

    #[test]
    fn test_truncates_to_max() {
        let metrics = TeamHealthMetrics {
            conflict_score: Some(90.0),
            burnout_risk: Some(80.0),
            skill_gap_score: Some(60.0),
            ..Default::default()
        };
        let recs = RecommendationEngine::new().generate(&metrics, DEFAULT_MAX_RECOMMENDATIONS);
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0].title, "Facilitate Team Mediation Sessions");
        assert_eq!(recs[1].title, "Workload Balancing");
    }

    #[test]
    fn test_thresholds_are_strict() {
        let metrics = TeamHealthMetrics {
            diversity_score: Some(50.0),
            conflict_score: Some(70.0),
            ..Default::default()
        };
        assert!(RecommendationEngine::new().generate(&metrics, 5).is_empty());
    }

    #[test]
    fn test_quick_wins() {
        let engine = RecommendationEngine::new();
        let metrics = TeamHealthMetrics {
            skill_gap_score: Some(50.0),
            ..Default::default()
        };
        let wins = engine.quick_wins(&engine.generate(&metrics, 5));
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].title, "Implement Peer Learning");
    }

    #[test]
    fn test_json_shape() {
        let metrics = TeamHealthMetrics {
            burnout_risk: Some(90.0),
            ..Default::default()
        };
        let recs = RecommendationEngine::new().generate(&metrics, 1);
        let json = serde_json::to_value(&recs[0]).unwrap();
        assert_eq!(json["type"], "process");
        assert_eq!(json["implementation_effort"], "medium");
        assert_eq!(json["priority"], 5);
    }
}
