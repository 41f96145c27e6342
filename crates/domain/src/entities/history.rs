//! Completion history ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{QuestId, TemplateId};

/// Immutable ledger record written on completion.
///
/// The ledger is append-only; the planner reads it to exclude recently
/// seen templates and to evaluate prerequisite chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestHistoryEntry {
    pub quest_id: QuestId,
    /// Carried alongside the instance id so exclusion checks never have to
    /// parse derived ids.
    pub template_id: TemplateId,
    pub completed_at: DateTime<Utc>,
    pub xp_earned: u32,
    pub time_spent_minutes: Option<u32>,
    /// Optional player rating, 1-5.
    pub rating: Option<u8>,
}

impl QuestHistoryEntry {
    pub fn new(
        quest_id: QuestId,
        template_id: TemplateId,
        completed_at: DateTime<Utc>,
        xp_earned: u32,
        time_spent_minutes: Option<u32>,
    ) -> Self {
        Self {
            quest_id,
            template_id,
            completed_at,
            xp_earned,
            time_spent_minutes,
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating.clamp(1, 5));
        self
    }
}
