//! MBTI / Jungian cognitive-function mapping

use super::definitions::ArchetypeType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Invalid MBTI type: {0}. Must be one of: {valid}", valid = MbtiType::valid_list())]
    InvalidType(String),
}

/// Jungian cognitive function (attitude + function)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JungianFunction {
    Ti,
    Te,
    Fi,
    Fe,
    Si,
    Se,
    Ni,
    Ne,
}

impl JungianFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            JungianFunction::Ti => "Ti",
            JungianFunction::Te => "Te",
            JungianFunction::Fi => "Fi",
            JungianFunction::Fe => "Fe",
            JungianFunction::Si => "Si",
            JungianFunction::Se => "Se",
            JungianFunction::Ni => "Ni",
            JungianFunction::Ne => "Ne",
        }
    }

    /// Same function with the opposite attitude
    pub fn shadow(&self) -> JungianFunction {
        match self {
            JungianFunction::Ti => JungianFunction::Te,
            JungianFunction::Te => JungianFunction::Ti,
            JungianFunction::Fi => JungianFunction::Fe,
            JungianFunction::Fe => JungianFunction::Fi,
            JungianFunction::Si => JungianFunction::Se,
            JungianFunction::Se => JungianFunction::Si,
            JungianFunction::Ni => JungianFunction::Ne,
            JungianFunction::Ne => JungianFunction::Ni,
        }
    }
}

impl fmt::Display for JungianFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Myers-Briggs type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MbtiType {
    INTJ,
    INTP,
    ENTJ,
    ENTP,
    INFJ,
    INFP,
    ENFJ,
    ENFP,
    ISTJ,
    ISFJ,
    ESTJ,
    ESFJ,
    ISTP,
    ISFP,
    ESTP,
    ESFP,
}

impl MbtiType {
    pub const ALL: [MbtiType; 16] = [
        MbtiType::INTJ,
        MbtiType::INTP,
        MbtiType::ENTJ,
        MbtiType::ENTP,
        MbtiType::INFJ,
        MbtiType::INFP,
        MbtiType::ENFJ,
        MbtiType::ENFP,
        MbtiType::ISTJ,
        MbtiType::ISFJ,
        MbtiType::ESTJ,
        MbtiType::ESFJ,
        MbtiType::ISTP,
        MbtiType::ISFP,
        MbtiType::ESTP,
        MbtiType::ESFP,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MbtiType::INTJ => "INTJ",
            MbtiType::INTP => "INTP",
            MbtiType::ENTJ => "ENTJ",
            MbtiType::ENTP => "ENTP",
            MbtiType::INFJ => "INFJ",
            MbtiType::INFP => "INFP",
            MbtiType::ENFJ => "ENFJ",
            MbtiType::ENFP => "ENFP",
            MbtiType::ISTJ => "ISTJ",
            MbtiType::ISFJ => "ISFJ",
            MbtiType::ESTJ => "ESTJ",
            MbtiType::ESFJ => "ESFJ",
            MbtiType::ISTP => "ISTP",
            MbtiType::ISFP => "ISFP",
            MbtiType::ESTP => "ESTP",
            MbtiType::ESFP => "ESFP",
        }
    }

    fn valid_list() -> String {
        MbtiType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MbtiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MbtiType {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        MbtiType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| ProfileError::InvalidType(s.to_string()))
    }
}

struct TypeMapping {
    stack: [JungianFunction; 4],
    affinity: [ArchetypeType; 2],
    strengths: [&'static str; 3],
    shadow: &'static str,
}

static MAPPINGS: Lazy<Vec<(MbtiType, TypeMapping)>> = Lazy::new(|| {
    use ArchetypeType as A;
    use JungianFunction::*;

    let m = |stack, affinity, strengths, shadow| TypeMapping {
        stack,
        affinity,
        strengths,
        shadow,
    };

    vec![
        (
            MbtiType::INTJ,
            m(
                [Ni, Te, Fi, Se],
                [A::Visionary, A::Analyst],
                ["Strategic planning", "Systems thinking", "Independence"],
                "May neglect emotional considerations",
            ),
        ),
        (
            MbtiType::INTP,
            m(
                [Ti, Ne, Si, Fe],
                [A::Analyst, A::Specialist],
                ["Logical analysis", "Conceptual modelling", "Objectivity"],
                "May overlook practical and interpersonal needs",
            ),
        ),
        (
            MbtiType::ENTJ,
            m(
                [Te, Ni, Se, Fi],
                [A::Leader, A::Visionary],
                ["Decisive leadership", "Long-range planning", "Efficiency"],
                "May override the feelings of others",
            ),
        ),
        (
            MbtiType::ENTP,
            m(
                [Ne, Ti, Fe, Si],
                [A::Innovator, A::Visionary],
                ["Ideation", "Debate", "Adaptability"],
                "May neglect routine and detail",
            ),
        ),
        (
            MbtiType::INFJ,
            m(
                [Ni, Fe, Ti, Se],
                [A::Visionary, A::Harmonizer],
                ["Insight into people", "Long-term vision", "Principled commitment"],
                "May withdraw when values are challenged",
            ),
        ),
        (
            MbtiType::INFP,
            m(
                [Fi, Ne, Si, Te],
                [A::Harmonizer, A::Innovator],
                ["Authenticity", "Empathy", "Creative expression"],
                "May avoid hard-edged decisions",
            ),
        ),
        (
            MbtiType::ENFJ,
            m(
                [Fe, Ni, Se, Ti],
                [A::Leader, A::Harmonizer],
                ["Inspiring others", "Building consensus", "Developing people"],
                "May neglect own needs for the group",
            ),
        ),
        (
            MbtiType::ENFP,
            m(
                [Ne, Fi, Te, Si],
                [A::Innovator, A::Harmonizer],
                ["Creativity", "Enthusiasm", "Understanding people"],
                "May struggle with follow-through",
            ),
        ),
        (
            MbtiType::ISTJ,
            m(
                [Si, Te, Fi, Ne],
                [A::Implementer, A::Specialist],
                ["Reliability", "Thoroughness", "Respect for process"],
                "May resist unfamiliar possibilities",
            ),
        ),
        (
            MbtiType::ISFJ,
            m(
                [Si, Fe, Ti, Ne],
                [A::Collaborator, A::Implementer],
                ["Loyalty", "Practical care", "Attention to detail"],
                "May suppress disagreement to keep the peace",
            ),
        ),
        (
            MbtiType::ESTJ,
            m(
                [Te, Si, Ne, Fi],
                [A::Implementer, A::Leader],
                ["Organization", "Accountability", "Clear direction"],
                "May dismiss emotional concerns as irrelevant",
            ),
        ),
        (
            MbtiType::ESFJ,
            m(
                [Fe, Si, Ne, Ti],
                [A::Collaborator, A::Harmonizer],
                ["Team cohesion", "Service", "Dependability"],
                "May seek approval at the expense of candor",
            ),
        ),
        (
            MbtiType::ISTP,
            m(
                [Ti, Se, Ni, Fe],
                [A::Specialist, A::Implementer],
                ["Troubleshooting", "Calm under pressure", "Hands-on skill"],
                "May disengage from emotional discussions",
            ),
        ),
        (
            MbtiType::ISFP,
            m(
                [Fi, Se, Ni, Te],
                [A::Harmonizer, A::Specialist],
                ["Aesthetic sense", "Kindness", "Flexibility"],
                "May avoid planning and structure",
            ),
        ),
        (
            MbtiType::ESTP,
            m(
                [Se, Ti, Fe, Ni],
                [A::Implementer, A::Leader],
                ["Quick action", "Negotiation", "Resourcefulness"],
                "May act before considering long-term consequences",
            ),
        ),
        (
            MbtiType::ESFP,
            m(
                [Se, Fi, Te, Ni],
                [A::Collaborator, A::Innovator],
                ["Energy", "Team spirit", "Practical empathy"],
                "May struggle with long-term commitments",
            ),
        ),
    ]
});

/// Function stack and characteristics for one MBTI type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JungianProfile {
    pub mbti_type: MbtiType,
    pub dominant_function: JungianFunction,
    pub auxiliary_function: JungianFunction,
    pub tertiary_function: JungianFunction,
    pub inferior_function: JungianFunction,
    pub function_stack: Vec<JungianFunction>,
    pub archetype_affinity: Vec<String>,
    pub strengths: Vec<String>,
    pub shadow: String,
}

/// Pairwise type compatibility
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCompatibility {
    pub compatible: bool,
    pub type1: MbtiType,
    pub type2: MbtiType,
    pub complementary_functions: bool,
    pub compatibility_score: u32,
}

/// Maps MBTI types onto Jungian profiles
#[derive(Debug, Default, Clone, Copy)]
pub struct JungianMapper;

impl JungianMapper {
    pub fn new() -> Self {
        Self
    }

    fn mapping(&self, mbti: MbtiType) -> &'static TypeMapping {
        // MAPPINGS follows MbtiType::ALL order
        &MAPPINGS[mbti as usize].1
    }

    pub fn profile(&self, mbti: MbtiType) -> JungianProfile {
        let mapping = self.mapping(mbti);
        let [dominant, auxiliary, tertiary, inferior] = mapping.stack;
        JungianProfile {
            mbti_type: mbti,
            dominant_function: dominant,
            auxiliary_function: auxiliary,
            tertiary_function: tertiary,
            inferior_function: inferior,
            function_stack: mapping.stack.to_vec(),
            archetype_affinity: mapping.affinity.iter().map(|a| a.label()).collect(),
            strengths: mapping.strengths.iter().map(|s| s.to_string()).collect(),
            shadow: mapping.shadow.to_string(),
        }
    }

    /// Archetypes this type gravitates to
    pub fn archetype_affinity(&self, mbti: MbtiType) -> &'static [ArchetypeType] {
        &self.mapping(mbti).affinity
    }

    /// Opposite-attitude stack
    pub fn shadow_functions(&self, profile: &JungianProfile) -> Vec<JungianFunction> {
        profile.function_stack.iter().map(|f| f.shadow()).collect()
    }

    /// Complementary when the auxiliary of one is the dominant of the other
    pub fn compatibility(&self, a: MbtiType, b: MbtiType) -> TypeCompatibility {
        let (ma, mb) = (self.mapping(a), self.mapping(b));
        let complementary = ma.stack[1] == mb.stack[0] || mb.stack[1] == ma.stack[0];
        TypeCompatibility {
            compatible: complementary,
            type1: a,
            type2: b,
            complementary_functions: complementary,
            compatibility_score: if complementary { 75 } else { 50 },
        }
    }
}
