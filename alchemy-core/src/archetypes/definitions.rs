//! Archetype definitions
//!
//! The eight team-role archetypes and their static descriptions.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse personality/team-role classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchetypeType {
    Leader,
    Innovator,
    Harmonizer,
    Analyst,
    Implementer,
    Visionary,
    Collaborator,
    Specialist,
}

impl ArchetypeType {
    /// All archetypes in declaration order
    pub const ALL: [ArchetypeType; 8] = [
        ArchetypeType::Leader,
        ArchetypeType::Innovator,
        ArchetypeType::Harmonizer,
        ArchetypeType::Analyst,
        ArchetypeType::Implementer,
        ArchetypeType::Visionary,
        ArchetypeType::Collaborator,
        ArchetypeType::Specialist,
    ];

    /// Wire name (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchetypeType::Leader => "leader",
            ArchetypeType::Innovator => "innovator",
            ArchetypeType::Harmonizer => "harmonizer",
            ArchetypeType::Analyst => "analyst",
            ArchetypeType::Implementer => "implementer",
            ArchetypeType::Visionary => "visionary",
            ArchetypeType::Collaborator => "collaborator",
            ArchetypeType::Specialist => "specialist",
        }
    }

    /// Upper-case label used in MBTI affinity lists
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for ArchetypeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown archetype name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Archetype type '{0}' not found")]
pub struct UnknownArchetype(pub String);

impl FromStr for ArchetypeType {
    type Err = UnknownArchetype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ArchetypeType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| UnknownArchetype(s.to_string()))
    }
}

/// Primary and secondary MBTI types associated with an archetype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JungianMapping {
    pub primary: String,
    pub secondary: String,
}

/// Static description of one archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDefinition {
    pub archetype_type: ArchetypeType,
    pub name: String,
    pub description: String,
    pub core_traits: Vec<String>,
    pub strengths: Vec<String>,
    pub challenges: Vec<String>,
    pub jungian_mapping: JungianMapping,
}

fn def(
    archetype_type: ArchetypeType,
    name: &str,
    description: &str,
    core_traits: &[&str],
    strengths: &[&str],
    challenges: &[&str],
    mbti: (&str, &str),
) -> ArchetypeDefinition {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    ArchetypeDefinition {
        archetype_type,
        name: name.to_string(),
        description: description.to_string(),
        core_traits: owned(core_traits),
        strengths: owned(strengths),
        challenges: owned(challenges),
        jungian_mapping: JungianMapping {
            primary: mbti.0.to_string(),
            secondary: mbti.1.to_string(),
        },
    }
}

static DEFINITIONS: Lazy<Vec<ArchetypeDefinition>> = Lazy::new(|| {
    vec![
        def(
            ArchetypeType::Leader,
            "The Leader",
            "Natural leader who takes charge and inspires others",
            &["decisive", "confident", "charismatic"],
            &["Strategic thinking", "Team motivation", "Decision making"],
            &["Can be domineering", "May overlook details"],
            ("ENTJ", "ESTJ"),
        ),
        def(
            ArchetypeType::Innovator,
            "The Innovator",
            "Creative thinker who generates new ideas and challenges the status quo",
            &["creative", "curious", "adaptable"],
            &["Idea generation", "Problem reframing", "Embracing change"],
            &["May lose interest in routine work", "Can start more than they finish"],
            ("ENTP", "ENFP"),
        ),
        def(
            ArchetypeType::Harmonizer,
            "The Harmonizer",
            "Empathetic connector who keeps the team cohesive and supported",
            &["empathetic", "diplomatic", "supportive"],
            &["Conflict resolution", "Team morale", "Active listening"],
            &["May avoid necessary confrontation", "Can neglect own needs"],
            ("ENFJ", "ESFJ"),
        ),
        def(
            ArchetypeType::Analyst,
            "The Analyst",
            "Systematic thinker who brings rigor and evidence to decisions",
            &["analytical", "logical", "detail-oriented"],
            &["Critical analysis", "Data interpretation", "Risk assessment"],
            &["Can over-analyze", "May appear detached"],
            ("INTJ", "INTP"),
        ),
        def(
            ArchetypeType::Implementer,
            "The Implementer",
            "Reliable executor who turns plans into concrete results",
            &["organized", "dependable", "practical"],
            &["Execution", "Process discipline", "Meeting deadlines"],
            &["May resist untested approaches", "Can be inflexible under change"],
            ("ISTJ", "ESTJ"),
        ),
        def(
            ArchetypeType::Visionary,
            "The Visionary",
            "Future-focused strategist who sets long-range direction",
            &["insightful", "strategic", "inspiring"],
            &["Long-term planning", "Pattern recognition", "Purpose setting"],
            &["May overlook present constraints", "Can be hard to follow"],
            ("INFJ", "INTJ"),
        ),
        def(
            ArchetypeType::Collaborator,
            "The Collaborator",
            "Team player who builds bridges and shares ownership of outcomes",
            &["cooperative", "open", "communicative"],
            &["Building consensus", "Knowledge sharing", "Cross-team coordination"],
            &["May defer too readily", "Can dilute accountability"],
            ("ESFJ", "ENFP"),
        ),
        def(
            ArchetypeType::Specialist,
            "The Specialist",
            "Deep expert who provides authoritative technical knowledge",
            &["focused", "knowledgeable", "precise"],
            &["Technical depth", "Quality standards", "Independent problem solving"],
            &["May have a narrow perspective", "Can struggle to delegate"],
            ("ISTP", "INTP"),
        ),
    ]
});

/// All archetype definitions, in declaration order
pub fn definitions() -> &'static [ArchetypeDefinition] {
    DEFINITIONS.as_slice()
}

/// Definition for one archetype
pub fn definition(archetype_type: ArchetypeType) -> &'static ArchetypeDefinition {
    // DEFINITIONS is built from ArchetypeType::ALL order
    &DEFINITIONS[archetype_type as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_definition() {
        assert_eq!(definitions().len(), ArchetypeType::ALL.len());
        for t in ArchetypeType::ALL {
            let d = definition(t);
            assert_eq!(d.archetype_type, t);
            assert!(!d.name.is_empty());
            assert!(!d.core_traits.is_empty());
        }
    }

    #[test]
    fn test_leader_definition() {
        let leader = definition(ArchetypeType::Leader);
        assert_eq!(leader.name, "The Leader");
        assert_eq!(
            leader.description,
            "Natural leader who takes charge and inspires others"
        );
        assert_eq!(leader.core_traits, vec!["decisive", "confident", "charismatic"]);
        assert_eq!(leader.jungian_mapping.primary, "ENTJ");
        assert_eq!(leader.jungian_mapping.secondary, "ESTJ");
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("LEADER".parse::<ArchetypeType>().unwrap(), ArchetypeType::Leader);
        assert_eq!("Analyst".parse::<ArchetypeType>().unwrap(), ArchetypeType::Analyst);
        assert!("wizard".parse::<ArchetypeType>().is_err());
    }

    #[test]
    fn test_serde_wire_name() {
        let json = serde_json::to_string(&ArchetypeType::Visionary).unwrap();
        assert_eq!(json, "\"visionary\"");
    }
}
