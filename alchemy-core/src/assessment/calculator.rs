//! Assessment scoring
//!
//! Turns a set of responses into category scores, a weighted total, a
//! trait profile and a completion percentage.

use super::models::{Question, Response};
use crate::archetypes::TraitProfile;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Calculated scores for one assessment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentScore {
    pub total_score: f64,
    pub category_scores: BTreeMap<String, f64>,
    #[serde(rename = "trait_scores")]
    pub trait_profile: TraitProfile,
    pub completion_percentage: f64,
}

impl AssessmentScore {
    fn empty() -> Self {
        Self {
            total_score: 0.0,
            category_scores: BTreeMap::new(),
            trait_profile: TraitProfile::new(),
            completion_percentage: 0.0,
        }
    }

    /// `{total_score, category_scores, trait_scores, completion_percentage}`
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "total_score": self.total_score,
            "category_scores": self.category_scores,
            "trait_scores": self.trait_profile.scores(),
            "completion_percentage": self.completion_percentage,
        })
    }
}

/// Team-level aggregate of individual scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAggregate {
    pub team_average: f64,
    pub team_variance: f64,
    pub category_averages: BTreeMap<String, f64>,
    pub team_size: usize,
}

pub struct AssessmentCalculator {
    category_weights: HashMap<&'static str, f64>,
}

impl AssessmentCalculator {
    /// Interpersonal carries 1.2, every other category 1.0
    pub fn new() -> Self {
        let category_weights = HashMap::from([
            ("cognitive", 1.0),
            ("emotional", 1.0),
            ("behavioral", 1.0),
            ("interpersonal", 1.2),
            ("motivational", 1.0),
        ]);
        Self { category_weights }
    }

    fn weight(&self, category: &str) -> f64 {
        self.category_weights
            .get(category.to_lowercase().as_str())
            .copied()
            .unwrap_or(1.0)
    }

    pub fn calculate(&self, responses: &[Response], questions: &[Question]) -> AssessmentScore {
        if responses.is_empty() {
            return AssessmentScore::empty();
        }

        let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

        let mut per_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let mut trait_profile = TraitProfile::new();

        for response in responses {
            let Some(question) = by_id.get(&response.question_id) else {
                continue;
            };
            let score = score_response(response);
            per_category
                .entry(question.category.clone())
                .or_default()
                .push(score);
            trait_profile.set_clamped(title_case(&question.category), score);
        }

        let category_scores: BTreeMap<String, f64> = per_category
            .into_iter()
            .map(|(cat, scores)| {
                let avg = scores.iter().sum::<f64>() / scores.len() as f64;
                (cat, avg)
            })
            .collect();

        let completion_percentage = if questions.is_empty() {
            0.0
        } else {
            responses.len() as f64 / questions.len() as f64 * 100.0
        };

        AssessmentScore {
            total_score: self.total_score(&category_scores),
            category_scores,
            trait_profile,
            completion_percentage,
        }
    }

    fn total_score(&self, category_scores: &BTreeMap<String, f64>) -> f64 {
        let (weighted, total_weight) = category_scores
            .iter()
            .fold((0.0, 0.0), |(sum, w), (cat, score)| {
                let weight = self.weight(cat);
                (sum + score * weight, w + weight)
            });
        if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        }
    }
}

impl Default for AssessmentCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Numbers count as-is, strings fall back on confidence, anything else is neutral
///
/// A missing or zero confidence on a string answer scores the neutral 50.
fn score_response(response: &Response) -> f64 {
    match &response.answer {
        Value::Number(n) => n.as_f64().unwrap_or(50.0),
        Value::String(_) => match response.confidence {
            Some(c) if c != 0.0 => c * 100.0,
            _ => 50.0,
        },
        _ => 50.0,
    }
}

/// Capitalise the first letter of every alphabetic run, lower-case the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Aggregate individual scores into team metrics (population variance)
pub fn team_aggregate(scores: &[AssessmentScore]) -> TeamAggregate {
    if scores.is_empty() {
        return TeamAggregate {
            team_average: 0.0,
            team_variance: 0.0,
            category_averages: BTreeMap::new(),
            team_size: 0,
        };
    }

    let n = scores.len() as f64;
    let team_average = scores.iter().map(|s| s.total_score).sum::<f64>() / n;
    let team_variance = scores
        .iter()
        .map(|s| (s.total_score - team_average).powi(2))
        .sum::<f64>()
        / n;

    let mut category_averages = BTreeMap::new();
    for cat in scores.iter().flat_map(|s| s.category_scores.keys()) {
        if category_averages.contains_key(cat) {
            continue;
        }
        let sum: f64 = scores
            .iter()
            .map(|s| s.category_scores.get(cat).copied().unwrap_or(0.0))
            .sum();
        category_averages.insert(cat.clone(), sum / n);
    }

    TeamAggregate {
        team_average,
        team_variance,
        category_averages,
        team_size: scores.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::models::QuestionType;
    use chrono::Utc;
    use serde_json::json;

    fn question(id: i64, category: &str) -> Question {
        Question {
            id,
            text: format!("Question {}", id),
            question_type: QuestionType::Scale,
            options: None,
            category: category.to_string(),
            weight: 1.0,
        }
    }

    fn response(question_id: i64, answer: Value, confidence: Option<f64>) -> Response {
        Response {
            id: question_id,
            assessment_id: 1,
            question_id,
            answer,
            confidence,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_text_answer_uses_confidence() {
        assert_eq!(score_response(&response(1, json!("agree"), Some(0.8))), 80.0);
        assert_eq!(score_response(&response(1, json!("agree"), None)), 50.0);
        assert_eq!(score_response(&response(1, json!("agree"), Some(0.0))), 50.0);
        assert_eq!(score_response(&response(1, json!([1, 2]), Some(0.9))), 50.0);
    }

    #[test]
    fn test_no_responses_is_zero() {
        let score = AssessmentCalculator::new().calculate(&[], &[question(1, "cognitive")]);
        assert_eq!(score.total_score, 0.0);
        assert!(score.category_scores.is_empty());
        assert_eq!(score.completion_percentage, 0.0);
    }

    #[test]
    fn test_weighted_total() {
        let questions = vec![question(1, "cognitive"), question(2, "interpersonal")];
        let responses = vec![response(1, json!(60), None), response(2, json!(80), None)];
        let score = AssessmentCalculator::new().calculate(&responses, &questions);

        assert_eq!(score.category_scores["cognitive"], 60.0);
        assert_eq!(score.category_scores["interpersonal"], 80.0);
        let expected = (60.0 + 80.0 * 1.2) / 2.2;
        assert!((score.total_score - expected).abs() < 1e-9);
        assert_eq!(score.completion_percentage, 100.0);
    }

    #[test]
    fn test_string_answers_use_confidence() {
        let questions = vec![question(1, "emotional"), question(2, "emotional"), question(3, "x")];
        let responses = vec![
            response(1, json!("often"), Some(0.9)),
            response(2, json!("sometimes"), None),
        ];
        let score = AssessmentCalculator::new().calculate(&responses, &questions);
        assert!((score.category_scores["emotional"] - 70.0).abs() < 1e-9);
        assert!((score.completion_percentage - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_trait_profile_title_cased_and_clamped() {
        let questions = vec![question(1, "team_work")];
        let responses = vec![response(1, json!(150), None)];
        let score = AssessmentCalculator::new().calculate(&responses, &questions);
        assert_eq!(score.trait_profile.score("Team_Work"), Some(100.0));
        assert_eq!(score.category_scores["team_work"], 150.0);
    }

    #[test]
    fn test_unknown_question_ignored() {
        let questions = vec![question(1, "cognitive")];
        let responses = vec![response(1, json!(40), None), response(99, json!(100), None)];
        let score = AssessmentCalculator::new().calculate(&responses, &questions);
        assert_eq!(score.category_scores.len(), 1);
        assert_eq!(score.total_score, 40.0);
    }

    #[test]
    fn test_to_json_shape() {
        let questions = vec![question(1, "cognitive")];
        let responses = [response(1, json!(70), None)];
        let score = AssessmentCalculator::new().calculate(&responses, &questions);
        let json = score.to_json();
        assert_eq!(json["trait_scores"]["Cognitive"], 70.0);
        assert_eq!(json["total_score"], 70.0);
    }

    #[test]
    fn test_team_aggregate_population_variance() {
        let calc = AssessmentCalculator::new();
        let qs = vec![question(1, "cognitive"), question(2, "emotional")];
        let a = calc.calculate(&[response(1, json!(40), None)], &qs);
        let b = calc.calculate(&[response(2, json!(80), None)], &qs);

        let agg = team_aggregate(&[a, b]);
        assert_eq!(agg.team_average, 60.0);
        assert_eq!(agg.team_variance, 400.0);
        assert_eq!(agg.category_averages["cognitive"], 20.0);
        assert_eq!(agg.category_averages["emotional"], 40.0);
        assert_eq!(agg.team_size, 2);
    }
}
