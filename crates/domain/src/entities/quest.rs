//! Materialized quest instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{QuestId, TemplateId};
use crate::value_objects::{Granularity, QuestCategory};

/// A materialized, time-bound occurrence of a quest template.
///
/// Created by the instance factory, mutated by the lifecycle tracker on
/// status transitions, and removed from the active set on expiry or
/// regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: QuestId,
    pub template_id: TemplateId,
    pub title: String,
    pub description: String,
    pub category: QuestCategory,
    pub difficulty: u8,
    /// XP basis for this instance (template base XP after variation
    /// modifiers); reward multipliers are applied on top at completion.
    pub xp: u32,
    pub granularity: Granularity,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    /// Completion progress, 0-100.
    pub progress: u8,
    pub current_completions: u32,
    /// Completions needed before the instance counts as done; always >= 1.
    pub max_completions: u32,
    pub time_limit_minutes: Option<u32>,
    pub tags: Vec<String>,
}

impl Quest {
    /// Construct a new instance, enforcing the time-window invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestId,
        template_id: TemplateId,
        title: String,
        description: String,
        category: QuestCategory,
        difficulty: u8,
        xp: u32,
        granularity: Granularity,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        max_completions: u32,
        time_limit_minutes: Option<u32>,
    ) -> Result<Self, DomainError> {
        if end_date <= start_date {
            return Err(DomainError::validation(format!(
                "quest '{}': end date must be after start date",
                id
            )));
        }
        if max_completions == 0 {
            return Err(DomainError::validation(format!(
                "quest '{}': max completions must be at least 1",
                id
            )));
        }
        let tags = vec![category.token().to_string(), granularity.token().to_string()];
        Ok(Self {
            id,
            template_id,
            title,
            description,
            category,
            difficulty,
            xp,
            granularity,
            start_date,
            end_date,
            completed: false,
            completed_at: None,
            progress: 0,
            current_completions: 0,
            max_completions,
            time_limit_minutes,
            tags,
        })
    }

    /// Whether the instance's time window has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    /// Record one completion step, keeping the bounded-completions
    /// invariant. Returns whether the instance is now fully complete.
    pub fn record_completion(&mut self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return true;
        }
        self.current_completions = (self.current_completions + 1).min(self.max_completions);
        if self.current_completions >= self.max_completions {
            self.completed = true;
            self.completed_at = Some(now);
            self.progress = 100;
        } else {
            self.progress = ((self.current_completions * 100) / self.max_completions) as u8;
        }
        self.completed
    }
}
