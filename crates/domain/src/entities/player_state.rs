//! Per-instance lifecycle records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::QuestId;

/// Lifecycle state of a quest instance.
///
/// `completed`, `expired`, and `skipped` are terminal: a new cycle requires
/// a newly materialized instance, stale ids are never resurrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Available,
    Active,
    Completed,
    Expired,
    Skipped,
}

impl QuestStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            QuestStatus::Available => "Available",
            QuestStatus::Active => "Active",
            QuestStatus::Completed => "Completed",
            QuestStatus::Expired => "Expired",
            QuestStatus::Skipped => "Skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuestStatus::Completed | QuestStatus::Expired | QuestStatus::Skipped
        )
    }

    /// Explicit transition table for the instance state machine.
    pub fn can_transition_to(&self, next: QuestStatus) -> bool {
        match (self, next) {
            (QuestStatus::Available, QuestStatus::Active)
            | (QuestStatus::Available, QuestStatus::Completed)
            | (QuestStatus::Available, QuestStatus::Skipped)
            | (QuestStatus::Available, QuestStatus::Expired)
            | (QuestStatus::Active, QuestStatus::Completed)
            | (QuestStatus::Active, QuestStatus::Skipped)
            | (QuestStatus::Active, QuestStatus::Expired) => true,
            _ => false,
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Per-instance lifecycle record, one-to-one with a live `Quest`.
///
/// Removed together with its quest on expiry or regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuestState {
    pub quest_id: QuestId,
    pub status: QuestStatus,
    /// Completion progress, 0-100, mirrored on the quest instance.
    pub progress: u8,
    pub current_completions: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Minutes the player has logged against this instance.
    pub time_spent_minutes: u32,
}

impl PlayerQuestState {
    pub fn new(quest_id: QuestId) -> Self {
        Self {
            quest_id,
            status: QuestStatus::Available,
            progress: 0,
            current_completions: 0,
            started_at: None,
            completed_at: None,
            time_spent_minutes: 0,
        }
    }
}
