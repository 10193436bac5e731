//! Freudian defense-mechanism analysis

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseMechanism {
    Repression,
    Denial,
    Projection,
    Displacement,
    Rationalization,
    ReactionFormation,
    Sublimation,
    Regression,
    Intellectualization,
    Humor,
}

impl DefenseMechanism {
    pub const ALL: [DefenseMechanism; 10] = [
        DefenseMechanism::Repression,
        DefenseMechanism::Denial,
        DefenseMechanism::Projection,
        DefenseMechanism::Displacement,
        DefenseMechanism::Rationalization,
        DefenseMechanism::ReactionFormation,
        DefenseMechanism::Sublimation,
        DefenseMechanism::Regression,
        DefenseMechanism::Intellectualization,
        DefenseMechanism::Humor,
    ];

    /// Wire value, e.g. `reaction_formation`
    pub fn as_str(&self) -> &'static str {
        match self {
            DefenseMechanism::Repression => "repression",
            DefenseMechanism::Denial => "denial",
            DefenseMechanism::Projection => "projection",
            DefenseMechanism::Displacement => "displacement",
            DefenseMechanism::Rationalization => "rationalization",
            DefenseMechanism::ReactionFormation => "reaction_formation",
            DefenseMechanism::Sublimation => "sublimation",
            DefenseMechanism::Regression => "regression",
            DefenseMechanism::Intellectualization => "intellectualization",
            DefenseMechanism::Humor => "humor",
        }
    }

    /// Constant-style name, e.g. `REACTION_FORMATION`
    pub fn type_name(&self) -> String {
        self.as_str().to_uppercase()
    }

    fn adaptiveness(&self) -> f64 {
        match self {
            DefenseMechanism::Sublimation
            | DefenseMechanism::Humor
            | DefenseMechanism::Intellectualization => 0.8,
            DefenseMechanism::Denial | DefenseMechanism::Projection => 0.3,
            _ => 0.5,
        }
    }
}

/// One defense mechanism observed in a person
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefenseProfile {
    pub mechanism: DefenseMechanism,
    /// 0-1
    pub frequency: f64,
    /// 0-1
    pub adaptiveness: f64,
    pub contexts: Vec<String>,
    pub is_maladaptive: bool,
}

impl DefenseProfile {
    pub fn is_maladaptive(&self) -> bool {
        self.adaptiveness < 0.4
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictAnalysis {
    pub defensiveness_level: f64,
    pub defense_maturity: f64,
    pub maladaptive_count: usize,
    pub primary_conflicts: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralBalance {
    pub id_strength: f64,
    pub ego_strength: f64,
    pub superego_strength: f64,
    pub balance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PsychosexualDevelopment {
    pub dominant_stage: String,
    pub fixations: Vec<String>,
    pub overall_maturity: f64,
}

pub struct FreudianAnalyzer {
    indicators: Vec<(DefenseMechanism, &'static [&'static str])>,
}

impl FreudianAnalyzer {
    pub fn new() -> Self {
        use DefenseMechanism::*;
        let indicators: Vec<(DefenseMechanism, &'static [&'static str])> = vec![
            (Denial, &["refuses to acknowledge", "ignores reality", "dismisses evidence"]),
            (
                Projection,
                &[
                    "attributes own feelings to others",
                    "accuses others of own faults",
                    "externalizes blame",
                ],
            ),
            (
                Rationalization,
                &["justifies behavior", "creates logical explanations", "excuses actions"],
            ),
            (
                Sublimation,
                &[
                    "channels energy productively",
                    "transforms impulses creatively",
                    "redirects to socially acceptable",
                ],
            ),
            (Repression, &["forgets painful", "blocks memories", "avoids thinking about"]),
            (
                Displacement,
                &["redirects anger", "takes frustration out on", "lashes out at"],
            ),
            (
                ReactionFormation,
                &["acts opposite to feelings", "overly friendly to rivals", "exaggerated opposite"],
            ),
            (Regression, &["childish behavior", "tantrum", "reverts to earlier habits"]),
            (
                Intellectualization,
                &[
                    "focuses on abstract analysis",
                    "detaches from emotions",
                    "over-analyzes feelings",
                ],
            ),
            (Humor, &["uses humor to cope", "jokes about stress", "finds comedy in difficulty"]),
        ];
        Self { indicators }
    }

    /// Defense mechanisms whose indicators appear in the behaviours, most frequent first
    pub fn identify_defenses(&self, behaviors: &[String]) -> Vec<DefenseProfile> {
        let lowered: Vec<String> = behaviors.iter().map(|b| b.to_lowercase()).collect();

        let mut profiles: Vec<DefenseProfile> = self
            .indicators
            .iter()
            .filter_map(|(mechanism, indicators)| {
                let matching: Vec<&String> = behaviors
                    .iter()
                    .zip(&lowered)
                    .filter(|(_, low)| indicators.iter().any(|ind| low.contains(ind)))
                    .map(|(orig, _)| orig)
                    .collect();
                if matching.is_empty() {
                    return None;
                }
                let adaptiveness = mechanism.adaptiveness();
                Some(DefenseProfile {
                    mechanism: *mechanism,
                    frequency: (matching.len() as f64 / 5.0).min(1.0),
                    adaptiveness,
                    contexts: matching.iter().take(3).map(|s| s.to_string()).collect(),
                    is_maladaptive: adaptiveness < 0.4,
                })
            })
            .collect();

        profiles.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));
        profiles
    }

    /// Fixed id/ego/superego balance until structural scoring is modelled
    pub fn structural_balance(&self) -> StructuralBalance {
        StructuralBalance {
            id_strength: 0.6,
            ego_strength: 0.7,
            superego_strength: 0.6,
            balance_score: 0.7,
        }
    }

    pub fn psychosexual_development(&self) -> PsychosexualDevelopment {
        PsychosexualDevelopment {
            dominant_stage: "genital".to_string(),
            fixations: Vec::new(),
            overall_maturity: 0.8,
        }
    }
}

impl Default for FreudianAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn analyze_conflict_patterns(profiles: &[DefenseProfile]) -> ConflictAnalysis {
    let maladaptive: Vec<&DefenseProfile> =
        profiles.iter().filter(|p| p.is_maladaptive()).collect();
    let mean = |f: fn(&DefenseProfile) -> f64| {
        if profiles.is_empty() {
            0.0
        } else {
            profiles.iter().map(f).sum::<f64>() / profiles.len() as f64
        }
    };

    let recommendations = maladaptive
        .iter()
        .filter_map(|p| match p.mechanism {
            DefenseMechanism::Denial => Some("Work on acknowledging difficult realities"),
            DefenseMechanism::Projection => Some("Practice self-reflection and ownership"),
            DefenseMechanism::Regression => Some("Develop mature coping strategies"),
            _ => None,
        })
        .map(String::from)
        .collect();

    ConflictAnalysis {
        defensiveness_level: mean(|p| p.frequency),
        defense_maturity: mean(|p| p.adaptiveness),
        maladaptive_count: maladaptive.len(),
        primary_conflicts: maladaptive.iter().map(|p| p.mechanism.as_str().to_string()).collect(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn behaviors(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identify_denial_and_sublimation() {
        let profiles = FreudianAnalyzer::new().identify_defenses(&behaviors(&[
            "Refuses to acknowledge the deadline slip",
            "Ignores reality of budget cuts",
            "Channels energy productively into side projects",
        ]));
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].mechanism, DefenseMechanism::Denial);
        assert!((profiles[0].frequency - 0.4).abs() < 1e-9);
        assert!(profiles[0].is_maladaptive);
        assert_eq!(profiles[1].mechanism, DefenseMechanism::Sublimation);
        assert_eq!(profiles[1].adaptiveness, 0.8);
    }

    #[test]
    fn test_frequency_caps_and_contexts_truncate() {
        let many: Vec<String> = (0..7).map(|i| format!("justifies behavior #{}", i)).collect();
        let profiles = FreudianAnalyzer::new().identify_defenses(&many);
        assert_eq!(profiles[0].mechanism, DefenseMechanism::Rationalization);
        assert_eq!(profiles[0].frequency, 1.0);
        assert_eq!(profiles[0].contexts.len(), 3);
        assert_eq!(profiles[0].adaptiveness, 0.5);
    }

    #[test]
    fn test_conflict_analysis() {
        let analyzer = FreudianAnalyzer::new();
        let profiles = analyzer.identify_defenses(&behaviors(&[
            "dismisses evidence",
            "externalizes blame",
            "uses humor to cope",
        ]));
        let analysis = analyze_conflict_patterns(&profiles);
        assert_eq!(analysis.maladaptive_count, 2);
        assert_eq!(analysis.primary_conflicts, vec!["denial", "projection"]);
        assert_eq!(
            analysis.recommendations,
            vec![
                "Work on acknowledging difficult realities",
                "Practice self-reflection and ownership"
            ]
        );
        assert!((analysis.defensiveness_level - 0.2).abs() < 1e-9);
        assert!((analysis.defense_maturity - (0.3 + 0.3 + 0.8) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_conflict_analysis() {
        let analysis = analyze_conflict_patterns(&[]);
        assert_eq!(analysis.defensiveness_level, 0.0);
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn test_mechanism_names() {
        assert_eq!(DefenseMechanism::ALL.len(), 10);
        assert_eq!(DefenseMechanism::ReactionFormation.type_name(), "REACTION_FORMATION");
        assert_eq!(FreudianAnalyzer::new().structural_balance().ego_strength, 0.7);
    }
}
