//! Quest template catalog entries.
//!
//! Templates are immutable: loaded once from the catalog and only ever
//! queried by the engine. Materialization into dated instances happens in
//! the engine's factory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::TemplateId;
use crate::value_objects::{Granularity, QuestCategory};

/// An explicit availability window for event-driven special quests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Alternate phrasing and reward modifiers applied to a template at
/// materialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestVariation {
    pub title: String,
    pub description: String,
    /// Multiplier on the template's base XP (1.0 when absent).
    pub xp_modifier: Option<f64>,
    /// Signed offset on the template's difficulty (0 when absent).
    pub difficulty_modifier: Option<i8>,
}

/// An abstract, reusable quest definition from which dated instances are
/// materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestTemplate {
    pub id: TemplateId,
    pub title: String,
    pub description: String,
    pub category: QuestCategory,
    /// Difficulty rating, 1 (trivial) to 5 (demanding).
    pub difficulty: u8,
    pub base_xp: u32,
    pub allowed_granularities: Vec<Granularity>,
    /// Positive selection weight for the seeded sampler.
    pub weight: f64,
    /// Minimum player level before this template becomes eligible.
    pub level_requirement: u32,
    /// Month numbers (1-12) in which the template is available; `None`
    /// means year-round.
    pub seasonal_availability: Option<Vec<u32>>,
    pub variations: Vec<QuestVariation>,
    /// Placeholder names the factory substitutes when `is_dynamic` is set.
    pub personalized_fields: Vec<String>,
    /// Templates that must appear in the completion history first.
    pub prerequisites: Vec<TemplateId>,
    /// Completions needed before an instance counts as done; `None` means
    /// a single completion.
    pub max_completions: Option<u32>,
    /// Whether title/description carry `{{placeholder}}` tokens.
    pub is_dynamic: bool,
    /// Expected completion time, basis of the reward time bonus.
    pub time_limit_minutes: Option<u32>,
    /// Explicit availability window for special event quests.
    pub event_window: Option<EventWindow>,
}

impl QuestTemplate {
    pub fn new(
        id: impl Into<TemplateId>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: QuestCategory,
        difficulty: u8,
        base_xp: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            category,
            difficulty,
            base_xp,
            allowed_granularities: vec![Granularity::Daily],
            weight: 1.0,
            level_requirement: 1,
            seasonal_availability: None,
            variations: Vec::new(),
            personalized_fields: Vec::new(),
            prerequisites: Vec::new(),
            max_completions: None,
            is_dynamic: false,
            time_limit_minutes: None,
            event_window: None,
        }
    }

    pub fn with_granularities(mut self, granularities: Vec<Granularity>) -> Self {
        self.allowed_granularities = granularities;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_level_requirement(mut self, level: u32) -> Self {
        self.level_requirement = level;
        self
    }

    pub fn with_seasonal_availability(mut self, months: Vec<u32>) -> Self {
        self.seasonal_availability = Some(months);
        self
    }

    pub fn with_variations(mut self, variations: Vec<QuestVariation>) -> Self {
        self.variations = variations;
        self
    }

    pub fn with_personalized_fields(mut self, fields: Vec<String>) -> Self {
        self.personalized_fields = fields;
        self.is_dynamic = true;
        self
    }

    pub fn with_prerequisites(mut self, prerequisites: Vec<TemplateId>) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    pub fn with_max_completions(mut self, max: u32) -> Self {
        self.max_completions = Some(max);
        self
    }

    pub fn with_dynamic(mut self, is_dynamic: bool) -> Self {
        self.is_dynamic = is_dynamic;
        self
    }

    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit_minutes = Some(minutes);
        self
    }

    pub fn with_event_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.event_window = Some(EventWindow { start, end });
        self
    }

    /// Whether this template may be instantiated at the given granularity.
    pub fn allows(&self, granularity: Granularity) -> bool {
        self.allowed_granularities.contains(&granularity)
    }

    /// Whether the template is in season for the given month (1-12).
    pub fn available_in_month(&self, month: u32) -> bool {
        match &self.seasonal_availability {
            Some(months) => months.contains(&month),
            None => true,
        }
    }

    /// Whether the given player level satisfies the requirement.
    pub fn satisfies_level(&self, player_level: u32) -> bool {
        player_level >= self.level_requirement
    }

    /// Validate catalog invariants on a loaded template.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().is_empty() {
            return Err(DomainError::validation("template id cannot be empty"));
        }
        if self.title.is_empty() {
            return Err(DomainError::validation(format!(
                "template '{}': title cannot be empty",
                self.id
            )));
        }
        if !(1..=5).contains(&self.difficulty) {
            return Err(DomainError::validation(format!(
                "template '{}': difficulty must be 1-5, got {}",
                self.id, self.difficulty
            )));
        }
        if self.base_xp == 0 {
            return Err(DomainError::validation(format!(
                "template '{}': base XP must be positive",
                self.id
            )));
        }
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(DomainError::validation(format!(
                "template '{}': weight must be a positive finite number",
                self.id
            )));
        }
        if self.allowed_granularities.is_empty() {
            return Err(DomainError::validation(format!(
                "template '{}': at least one granularity required",
                self.id
            )));
        }
        if let Some(months) = &self.seasonal_availability {
            if months.is_empty() || months.iter().any(|m| !(1..=12).contains(m)) {
                return Err(DomainError::validation(format!(
                    "template '{}': seasonal months must be within 1-12",
                    self.id
                )));
            }
        }
        if self.max_completions == Some(0) {
            return Err(DomainError::validation(format!(
                "template '{}': max completions must be at least 1",
                self.id
            )));
        }
        if let Some(window) = &self.event_window {
            if window.end <= window.start {
                return Err(DomainError::validation(format!(
                    "template '{}': event window must end after it starts",
                    self.id
                )));
            }
        }
        Ok(())
    }
}
