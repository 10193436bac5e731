//! Jungian archetype analysis
//!
//! Detects archetypal patterns from free-text behaviour descriptions by
//! indicator-phrase matching, then derives individuation progress for a
//! person and collective patterns for a group.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JungianArchetype {
    #[serde(rename = "self")]
    SelfArchetype,
    Shadow,
    Anima,
    Animus,
    Persona,
    WiseOldMan,
    GreatMother,
    Hero,
    Trickster,
}

impl JungianArchetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            JungianArchetype::SelfArchetype => "self",
            JungianArchetype::Shadow => "shadow",
            JungianArchetype::Anima => "anima",
            JungianArchetype::Animus => "animus",
            JungianArchetype::Persona => "persona",
            JungianArchetype::WiseOldMan => "wise_old_man",
            JungianArchetype::GreatMother => "great_mother",
            JungianArchetype::Hero => "hero",
            JungianArchetype::Trickster => "trickster",
        }
    }
}

/// One archetype active in a person
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypalPattern {
    pub archetype: JungianArchetype,
    /// 0-1
    pub strength: f64,
    pub manifestations: Vec<String>,
    pub integration_level: f64,
}

impl ArchetypalPattern {
    pub fn is_dominant(&self) -> bool {
        self.strength > 0.7
    }

    pub fn needs_integration(&self) -> bool {
        self.integration_level < 0.5
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndividuationProgress {
    pub self_realization: f64,
    pub shadow_integration: f64,
    pub overall_integration: f64,
    pub active_archetypes: usize,
    pub individuation_stage: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectivePatterns {
    /// Archetype → share of members for whom it is dominant (only > 30%)
    pub collective_archetypes: BTreeMap<JungianArchetype, f64>,
    pub archetype_diversity: usize,
    pub group_size: usize,
    pub dominant_pattern: Option<JungianArchetype>,
}

const DEFAULT_INTEGRATION: f64 = 0.6;

pub struct JungianAnalyzer {
    indicators: Vec<(JungianArchetype, &'static [&'static str])>,
}

impl JungianAnalyzer {
    pub fn new() -> Self {
        use JungianArchetype::*;
        let indicators: Vec<(JungianArchetype, &'static [&'static str])> = vec![
            (
                Hero,
                &[
                    "overcomes challenges",
                    "seeks achievement",
                    "competitive nature",
                    "goal-oriented",
                ],
            ),
            (
                Shadow,
                &[
                    "hidden tendencies",
                    "repressed desires",
                    "unconscious behaviors",
                    "denied aspects",
                ],
            ),
            (
                WiseOldMan,
                &["seeks wisdom", "mentoring others", "reflective nature", "values knowledge"],
            ),
            (
                SelfArchetype,
                &[
                    "seeks wholeness",
                    "balanced perspective",
                    "integrates opposites",
                    "sense of purpose",
                ],
            ),
            (
                Anima,
                &[
                    "emotional sensitivity",
                    "intuitive insight",
                    "nurtures creativity",
                    "receptive to feelings",
                ],
            ),
            (
                Animus,
                &["assertive reasoning", "decisive action", "logical argument", "takes initiative"],
            ),
            (
                Persona,
                &[
                    "maintains public image",
                    "adapts to expectations",
                    "professional mask",
                    "seeks approval",
                ],
            ),
            (
                GreatMother,
                &["nurturing others", "protective of team", "caring support", "creates safe space"],
            ),
            (
                Trickster,
                &["challenges conventions", "playful humor", "disrupts routine", "bends rules"],
            ),
        ];
        Self { indicators }
    }

    /// Archetypes whose indicators appear in the behaviours, strongest first
    pub fn identify_active_archetypes(&self, behaviors: &[String]) -> Vec<ArchetypalPattern> {
        let lowered: Vec<String> = behaviors.iter().map(|b| b.to_lowercase()).collect();

        let mut patterns: Vec<ArchetypalPattern> = self
            .indicators
            .iter()
            .filter_map(|(archetype, indicators)| {
                let manifestations: Vec<String> = behaviors
                    .iter()
                    .zip(&lowered)
                    .filter(|(_, low)| indicators.iter().any(|ind| low.contains(ind)))
                    .map(|(orig, _)| orig.clone())
                    .collect();
                if manifestations.is_empty() {
                    return None;
                }
                Some(ArchetypalPattern {
                    archetype: *archetype,
                    strength: (manifestations.len() as f64 / indicators.len() as f64).min(1.0),
                    manifestations,
                    integration_level: DEFAULT_INTEGRATION,
                })
            })
            .collect();

        patterns.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        patterns
    }

    pub fn individuation_progress(&self, patterns: &[ArchetypalPattern]) -> IndividuationProgress {
        let find = |target| patterns.iter().find(|p| p.archetype == target);
        let overall = if patterns.is_empty() {
            0.0
        } else {
            patterns.iter().map(|p| p.integration_level).sum::<f64>() / patterns.len() as f64
        };

        IndividuationProgress {
            self_realization: find(JungianArchetype::SelfArchetype).map_or(0.0, |p| p.strength),
            shadow_integration: find(JungianArchetype::Shadow).map_or(0.0, |p| p.integration_level),
            overall_integration: overall,
            active_archetypes: patterns.len(),
            individuation_stage: individuation_stage(overall),
        }
    }
}

impl Default for JungianAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn individuation_stage(integration: f64) -> &'static str {
    if integration < 0.3 {
        "early"
    } else if integration < 0.6 {
        "developing"
    } else if integration < 0.8 {
        "advanced"
    } else {
        "integrated"
    }
}

/// Dominant archetypes shared across a group
pub fn collective_patterns(group: &[Vec<ArchetypalPattern>]) -> CollectivePatterns {
    let mut counts: BTreeMap<JungianArchetype, usize> = BTreeMap::new();
    for member in group {
        for pattern in member.iter().filter(|p| p.is_dominant()) {
            *counts.entry(pattern.archetype).or_insert(0) += 1;
        }
    }

    let total = group.len();
    let collective_archetypes = if total == 0 {
        BTreeMap::new()
    } else {
        counts
            .iter()
            .map(|(a, c)| (*a, *c as f64 / total as f64))
            .filter(|(_, share)| *share > 0.3)
            .collect()
    };

    // First maximum wins on ties
    let dominant_pattern = counts
        .iter()
        .fold(None::<(JungianArchetype, usize)>, |best, (a, c)| match best {
            Some((_, bc)) if bc >= *c => best,
            _ => Some((*a, *c)),
        })
        .map(|(a, _)| a);

    CollectivePatterns {
        collective_archetypes,
        archetype_diversity: counts.len(),
        group_size: total,
        dominant_pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn behaviors(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identify_hero() {
        let analyzer = JungianAnalyzer::new();
        let patterns = analyzer.identify_active_archetypes(&behaviors(&[
            "Overcomes challenges under pressure",
            "Very goal-oriented in planning",
            "Seeks achievement in every project",
            "enjoys lunch",
        ]));
        assert_eq!(patterns[0].archetype, JungianArchetype::Hero);
        assert_eq!(patterns[0].strength, 0.75);
        assert_eq!(patterns[0].manifestations.len(), 3);
        assert!(!patterns[0].is_dominant());
        assert!(!patterns[0].needs_integration());
    }

    #[test]
    fn test_no_matches() {
        let patterns = JungianAnalyzer::new().identify_active_archetypes(&behaviors(&["quiet"]));
        assert!(patterns.is_empty());
        let progress = JungianAnalyzer::new().individuation_progress(&patterns);
        assert_eq!(progress.individuation_stage, "early");
        assert_eq!(progress.active_archetypes, 0);
    }

    #[test]
    fn test_sorted_by_strength() {
        let patterns = JungianAnalyzer::new().identify_active_archetypes(&behaviors(&[
            "mentoring others",
            "hidden tendencies",
            "repressed desires",
        ]));
        assert_eq!(patterns[0].archetype, JungianArchetype::Shadow);
        assert_eq!(patterns[1].archetype, JungianArchetype::WiseOldMan);
    }

    #[test]
    fn test_individuation_progress() {
        let analyzer = JungianAnalyzer::new();
        let patterns = analyzer.identify_active_archetypes(&behaviors(&["hidden tendencies"]));
        let progress = analyzer.individuation_progress(&patterns);
        assert_eq!(progress.shadow_integration, 0.6);
        assert_eq!(progress.self_realization, 0.0);
        assert_eq!(progress.individuation_stage, "advanced");
    }

    #[test]
    fn test_collective_patterns() {
        let hero = ArchetypalPattern {
            archetype: JungianArchetype::Hero,
            strength: 1.0,
            manifestations: vec![],
            integration_level: 0.6,
        };
        let weak_shadow = ArchetypalPattern {
            archetype: JungianArchetype::Shadow,
            strength: 0.25,
            manifestations: vec![],
            integration_level: 0.6,
        };
        let group = vec![vec![hero.clone()], vec![hero], vec![weak_shadow], vec![]];
        let result = collective_patterns(&group);
        assert_eq!(result.group_size, 4);
        assert_eq!(result.archetype_diversity, 1);
        assert_eq!(result.collective_archetypes[&JungianArchetype::Hero], 0.5);
        assert_eq!(result.dominant_pattern, Some(JungianArchetype::Hero));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["dominant_pattern"], "hero");
    }

    #[test]
    fn test_collective_patterns_empty() {
        let result = collective_patterns(&[]);
        assert_eq!(result.dominant_pattern, None);
        assert!(result.collective_archetypes.is_empty());
    }
}
