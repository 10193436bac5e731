//! Action plans built from recommendations

use super::recommendations::Recommendation;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionItem {
    pub title: String,
    pub description: String,
    pub owner: String,
    pub deadline: DateTime<Utc>,
    pub dependencies: Vec<String>,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlan {
    pub goal: String,
    pub items: Vec<ActionItem>,
    pub timeline_weeks: u32,
    pub success_metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanProgress {
    pub total_items: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub completion_percentage: f64,
}

const OWNER: &str = "Team Lead";
const TIMELINE_WEEKS: u32 = 8;

#[derive(Debug, Default, Clone, Copy)]
pub struct ActionPlanGenerator;

impl ActionPlanGenerator {
    pub fn new() -> Self {
        Self
    }

    /// One item per top-three recommendation, two weeks apart, then a review at week 8
    pub fn generate(
        &self,
        goal: &str,
        recommendations: &[Recommendation],
        base: DateTime<Utc>,
    ) -> ActionPlan {
        let mut items: Vec<ActionItem> = recommendations
            .iter()
            .take(3)
            .enumerate()
            .map(|(i, rec)| ActionItem {
                title: format!("Implement: {}", rec.title),
                description: rec.description.clone(),
                owner: OWNER.to_string(),
                deadline: base + Duration::weeks((i as i64 + 1) * 2),
                dependencies: Vec::new(),
                status: ItemStatus::Pending,
            })
            .collect();

        let dependencies = items.iter().map(|item| item.title.clone()).collect();
        items.push(ActionItem {
            title: "Review Progress".to_string(),
            description: "Assess implementation progress and adjust plan".to_string(),
            owner: OWNER.to_string(),
            deadline: base + Duration::weeks(i64::from(TIMELINE_WEEKS)),
            dependencies,
            status: ItemStatus::Pending,
        });

        ActionPlan {
            goal: goal.to_string(),
            items,
            timeline_weeks: TIMELINE_WEEKS,
            success_metrics: vec![
                "Improved team satisfaction scores".to_string(),
                "Increased productivity metrics".to_string(),
                "Better communication ratings".to_string(),
            ],
        }
    }

    pub fn track_progress(&self, plan: &ActionPlan) -> PlanProgress {
        let total = plan.items.len();
        let count = |status| plan.items.iter().filter(|i| i.status == status).count();
        let completed = count(ItemStatus::Completed);
        let in_progress = count(ItemStatus::InProgress);

        PlanProgress {
            total_items: total,
            completed,
            in_progress,
            pending: total - completed - in_progress,
            completion_percentage: if total > 0 {
                completed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}
