//! Shadow work: identifying shadow elements and planning their integration

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowAspect {
    RepressedDesire,
    DeniedTrait,
    ProjectedQuality,
    UnacknowledgedStrength,
    HiddenWeakness,
}

impl ShadowAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShadowAspect::RepressedDesire => "repressed_desire",
            ShadowAspect::DeniedTrait => "denied_trait",
            ShadowAspect::ProjectedQuality => "projected_quality",
            ShadowAspect::UnacknowledgedStrength => "unacknowledged_strength",
            ShadowAspect::HiddenWeakness => "hidden_weakness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Unaware,
    Aware,
    Integrating,
    Integrated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadowElement {
    pub aspect_type: ShadowAspect,
    pub description: String,
    /// 0-1
    pub intensity: f64,
    pub triggers: Vec<String>,
    pub integration_status: IntegrationStatus,
}

impl ShadowElement {
    pub fn is_integrated(&self) -> bool {
        self.integration_status == IntegrationStatus::Integrated
    }

    pub fn needs_work(&self) -> bool {
        matches!(
            self.integration_status,
            IntegrationStatus::Unaware | IntegrationStatus::Aware
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadowWorkPlan {
    pub target_element: ShadowElement,
    pub techniques: Vec<String>,
    pub timeline: &'static str,
    pub expected_outcomes: Vec<String>,
    pub support_needed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationProgress {
    pub total_elements: usize,
    pub integrated: usize,
    pub in_progress: usize,
    pub needs_work: usize,
    pub average_intensity: f64,
    pub integration_rate: f64,
    pub time_period: String,
    pub overall_status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exercise {
    pub name: &'static str,
    pub description: &'static str,
    pub duration: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamShadowDynamics {
    pub team_size: usize,
    pub total_shadow_elements: usize,
    pub collective_patterns: BTreeMap<ShadowAspect, f64>,
    pub integration_priority: Vec<String>,
    pub team_shadow_intensity: f64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub struct ShadowWorkAnalyzer {
    techniques: Vec<(ShadowAspect, &'static [&'static str])>,
}

impl ShadowWorkAnalyzer {
    pub fn new() -> Self {
        let techniques: Vec<(ShadowAspect, &'static [&'static str])> = vec![
            (
                ShadowAspect::RepressedDesire,
                &[
                    "Journaling about hidden wants",
                    "Safe expression exercises",
                    "Desire mapping",
                    "Values clarification",
                ],
            ),
            (
                ShadowAspect::DeniedTrait,
                &[
                    "Self-reflection exercises",
                    "Feedback integration",
                    "Trait acceptance work",
                    "Reframing perspectives",
                ],
            ),
            (
                ShadowAspect::ProjectedQuality,
                &[
                    "Projection identification",
                    "Ownership exercises",
                    "Mirror work",
                    "Relationship pattern analysis",
                ],
            ),
        ];
        Self { techniques }
    }

    /// Shadow elements from assessment data and reported projections
    ///
    /// `assessment_data` may carry `unfulfilled_goals` (list) and
    /// `trait_discrepancies` (trait → 0-1); discrepancies above 0.5 count
    /// as denied traits.
    pub fn identify_shadow_elements(
        &self,
        assessment_data: &Value,
        projections: &[String],
    ) -> Vec<ShadowElement> {
        let mut elements = Vec::new();

        if let Some(goals) = assessment_data.get("unfulfilled_goals").and_then(Value::as_array) {
            for goal in goals {
                let goal = match goal {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                elements.push(ShadowElement {
                    aspect_type: ShadowAspect::RepressedDesire,
                    description: format!("Repressed desire: {}", goal),
                    intensity: 0.7,
                    triggers: strings(&["goal-related situations"]),
                    integration_status: IntegrationStatus::Aware,
                });
            }
        }

        for projection in projections {
            elements.push(ShadowElement {
                aspect_type: ShadowAspect::ProjectedQuality,
                description: format!("Projected quality: {}", projection),
                intensity: 0.8,
                triggers: strings(&["similar others"]),
                integration_status: IntegrationStatus::Unaware,
            });
        }

        if let Some(discrepancies) = assessment_data
            .get("trait_discrepancies")
            .and_then(Value::as_object)
        {
            for (trait_name, value) in discrepancies {
                let Some(discrepancy) = value.as_f64() else {
                    continue;
                };
                if discrepancy > 0.5 {
                    elements.push(ShadowElement {
                        aspect_type: ShadowAspect::DeniedTrait,
                        description: format!("Denied trait: {}", trait_name),
                        intensity: discrepancy,
                        triggers: strings(&["trait-relevant situations"]),
                        integration_status: IntegrationStatus::Aware,
                    });
                }
            }
        }

        elements
    }

    pub fn integration_plan(&self, element: &ShadowElement) -> ShadowWorkPlan {
        let techniques = self
            .techniques
            .iter()
            .find(|(aspect, _)| *aspect == element.aspect_type)
            .map(|(_, t)| strings(t))
            .unwrap_or_else(|| strings(&["General shadow work", "Therapeutic support"]));

        let timeline = if element.intensity > 0.7
            && element.integration_status == IntegrationStatus::Unaware
        {
            "6-12 months"
        } else if element.integration_status == IntegrationStatus::Aware {
            "3-6 months"
        } else {
            "1-3 months"
        };

        ShadowWorkPlan {
            target_element: element.clone(),
            techniques,
            timeline,
            expected_outcomes: strings(&[
                "Increased self-awareness",
                "Reduced projection",
                "Greater wholeness",
                "Improved relationships",
            ]),
            support_needed: strings(&[
                "Therapeutic guidance",
                "Safe practice space",
                "Supportive relationships",
            ]),
        }
    }

    pub fn integration_progress(
        &self,
        elements: &[ShadowElement],
        time_period: &str,
    ) -> IntegrationProgress {
        let integrated = elements.iter().filter(|e| e.is_integrated()).count();
        let total = elements.len();
        let ratio = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };

        let overall_status = if total == 0 {
            "no_data"
        } else if ratio(integrated) > 0.7 {
            "advanced"
        } else if ratio(integrated) > 0.4 {
            "progressing"
        } else {
            "beginning"
        };

        IntegrationProgress {
            total_elements: total,
            integrated,
            in_progress: elements
                .iter()
                .filter(|e| e.integration_status == IntegrationStatus::Integrating)
                .count(),
            needs_work: elements.iter().filter(|e| e.needs_work()).count(),
            average_intensity: if total == 0 {
                0.0
            } else {
                elements.iter().map(|e| e.intensity).sum::<f64>() / total as f64
            },
            integration_rate: ratio(integrated),
            time_period: time_period.to_string(),
            overall_status,
        }
    }
}

impl Default for ShadowWorkAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Guided exercises for projected qualities and repressed desires
pub fn exercises(element: &ShadowElement) -> Vec<Exercise> {
    match element.aspect_type {
        ShadowAspect::ProjectedQuality => vec![
            Exercise {
                name: "Projection Reclamation",
                description: "Identify qualities you dislike in others and explore how they might exist in yourself",
                duration: "15-30 minutes daily",
            },
            Exercise {
                name: "Three Column Technique",
                description: "List what you project, why you reject it, and how you might own it",
                duration: "20 minutes weekly",
            },
        ],
        ShadowAspect::RepressedDesire => vec![
            Exercise {
                name: "Desire Exploration",
                description: "Journal freely about hidden wants without judgment",
                duration: "20 minutes daily",
            },
            Exercise {
                name: "Safe Expression",
                description: "Practice expressing desires in safe, appropriate contexts",
                duration: "Ongoing practice",
            },
        ],
        _ => Vec::new(),
    }
}

pub fn team_shadow_dynamics(members: &[Vec<ShadowElement>]) -> TeamShadowDynamics {
    let all: Vec<&ShadowElement> = members.iter().flatten().collect();

    // First-seen order, so ties in the priority list stay stable
    let mut counts: Vec<(ShadowAspect, usize)> = Vec::new();
    for element in &all {
        match counts.iter_mut().find(|(a, _)| *a == element.aspect_type) {
            Some((_, c)) => *c += 1,
            None => counts.push((element.aspect_type, 1)),
        }
    }

    let team_size = members.len();
    let collective_patterns = if team_size == 0 {
        BTreeMap::new()
    } else {
        counts
            .iter()
            .map(|(a, c)| (*a, *c as f64 / team_size as f64))
            .filter(|(_, share)| *share > 0.5)
            .collect()
    };

    let mut ranked = counts.clone();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    TeamShadowDynamics {
        team_size,
        total_shadow_elements: all.len(),
        collective_patterns,
        integration_priority: ranked.iter().take(3).map(|(a, _)| a.as_str().to_string()).collect(),
        team_shadow_intensity: if all.is_empty() {
            0.0
        } else {
            all.iter().map(|e| e.intensity).sum::<f64>() / all.len() as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(aspect: ShadowAspect, intensity: f64, status: IntegrationStatus) -> ShadowElement {
        ShadowElement {
            aspect_type: aspect,
            description: "test".into(),
            intensity,
            triggers: vec![],
            integration_status: status,
        }
    }

    #[test]
    fn test_identify_elements() {
        let data = json!({
            "unfulfilled_goals": ["write a novel"],
            "trait_discrepancies": {"assertiveness": 0.8, "patience": 0.3}
        });
        let elements = ShadowWorkAnalyzer::new()
            .identify_shadow_elements(&data, &["arrogance".to_string()]);

        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].description, "Repressed desire: write a novel");
        assert_eq!(elements[0].intensity, 0.7);
        assert_eq!(elements[1].aspect_type, ShadowAspect::ProjectedQuality);
        assert_eq!(elements[1].integration_status, IntegrationStatus::Unaware);
        assert_eq!(elements[2].description, "Denied trait: assertiveness");
        assert_eq!(elements[2].intensity, 0.8);
    }

    #[test]
    fn test_plan_timelines() {
        let analyzer = ShadowWorkAnalyzer::new();
        let projected = element(ShadowAspect::ProjectedQuality, 0.8, IntegrationStatus::Unaware);
        assert_eq!(analyzer.integration_plan(&projected).timeline, "6-12 months");
        assert_eq!(
            analyzer.integration_plan(&projected).techniques[0],
            "Projection identification"
        );

        let aware = element(ShadowAspect::RepressedDesire, 0.7, IntegrationStatus::Aware);
        assert_eq!(analyzer.integration_plan(&aware).timeline, "3-6 months");

        let hidden = element(ShadowAspect::HiddenWeakness, 0.2, IntegrationStatus::Integrating);
        let plan = analyzer.integration_plan(&hidden);
        assert_eq!(plan.timeline, "1-3 months");
        assert_eq!(plan.techniques, vec!["General shadow work", "Therapeutic support"]);
        assert_eq!(plan.expected_outcomes.len(), 4);
    }

    #[test]
    fn test_progress_status() {
        let analyzer = ShadowWorkAnalyzer::new();
        assert_eq!(analyzer.integration_progress(&[], "3 months").overall_status, "no_data");

        let elements = vec![
            element(ShadowAspect::DeniedTrait, 0.6, IntegrationStatus::Integrated),
            element(ShadowAspect::DeniedTrait, 0.6, IntegrationStatus::Integrated),
            element(ShadowAspect::DeniedTrait, 0.6, IntegrationStatus::Integrating),
        ];
        let progress = analyzer.integration_progress(&elements, "3 months");
        assert_eq!(progress.integrated, 2);
        assert_eq!(progress.in_progress, 1);
        assert_eq!(progress.needs_work, 0);
        assert_eq!(progress.overall_status, "progressing");
    }

    #[test]
    fn test_exercises() {
        let projected = element(ShadowAspect::ProjectedQuality, 0.8, IntegrationStatus::Unaware);
        let names: Vec<&str> = exercises(&projected).iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Projection Reclamation", "Three Column Technique"]);
        let denied = element(ShadowAspect::DeniedTrait, 0.8, IntegrationStatus::Aware);
        assert!(exercises(&denied).is_empty());
    }

    #[test]
    fn test_team_dynamics() {
        let projected = element(ShadowAspect::ProjectedQuality, 0.8, IntegrationStatus::Unaware);
        let desire = element(ShadowAspect::RepressedDesire, 0.4, IntegrationStatus::Aware);
        let team = vec![
            vec![projected.clone(), desire.clone()],
            vec![projected.clone()],
            vec![],
        ];
        let dynamics = team_shadow_dynamics(&team);
        assert_eq!(dynamics.team_size, 3);
        assert_eq!(dynamics.total_shadow_elements, 3);
        assert_eq!(dynamics.integration_priority, vec!["projected_quality", "repressed_desire"]);
        let projected = dynamics.collective_patterns[&ShadowAspect::ProjectedQuality];
        assert!((projected - 2.0 / 3.0).abs() < 1e-9);
        assert!(!dynamics.collective_patterns.contains_key(&ShadowAspect::RepressedDesire));
        assert!((dynamics.team_shadow_intensity - 2.0 / 3.0).abs() < 1e-9);
    }
}
