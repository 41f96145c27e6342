//! The per-user aggregate root.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::history::QuestHistoryEntry;
use crate::entities::player_state::PlayerQuestState;
use crate::entities::quest::Quest;
use crate::ids::{QuestId, TemplateId};
use crate::value_objects::{Granularity, QuestCategory, QuestPreferences};

/// Last generation date per granularity.
///
/// One named field per granularity, selected via explicit `match`, so the
/// reset state machine stays exhaustively checkable by the compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastResetDates {
    pub daily: Option<NaiveDate>,
    pub weekly: Option<NaiveDate>,
    pub monthly: Option<NaiveDate>,
    pub special: Option<NaiveDate>,
}

impl LastResetDates {
    pub fn get(&self, granularity: Granularity) -> Option<NaiveDate> {
        match granularity {
            Granularity::Daily => self.daily,
            Granularity::Weekly => self.weekly,
            Granularity::Monthly => self.monthly,
            Granularity::Special => self.special,
        }
    }

    pub fn set(&mut self, granularity: Granularity, date: NaiveDate) {
        match granularity {
            Granularity::Daily => self.daily = Some(date),
            Granularity::Weekly => self.weekly = Some(date),
            Granularity::Monthly => self.monthly = Some(date),
            Granularity::Special => self.special = Some(date),
        }
    }
}

/// Consecutive reset periods with at least one completion, per granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakCounters {
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
    pub special: u32,
}

impl StreakCounters {
    pub fn get(&self, granularity: Granularity) -> u32 {
        match granularity {
            Granularity::Daily => self.daily,
            Granularity::Weekly => self.weekly,
            Granularity::Monthly => self.monthly,
            Granularity::Special => self.special,
        }
    }

    pub fn set(&mut self, granularity: Granularity, value: u32) {
        match granularity {
            Granularity::Daily => self.daily = value,
            Granularity::Weekly => self.weekly = value,
            Granularity::Monthly => self.monthly = value,
            Granularity::Special => self.special = value,
        }
    }

    pub fn increment(&mut self, granularity: Granularity) {
        self.set(granularity, self.get(granularity).saturating_add(1));
    }

    pub fn reset(&mut self, granularity: Granularity) {
        self.set(granularity, 0);
    }
}

/// Aggregate root owned by one user: the single unit of persistence.
///
/// The engine reads a state and returns a new one; it never persists it
/// itself, and it assumes the caller serializes read-modify-write cycles
/// for a given user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSystemState {
    pub active_quests: Vec<Quest>,
    /// Append-only completion ledger, oldest first.
    pub quest_history: Vec<QuestHistoryEntry>,
    pub player_quest_states: HashMap<QuestId, PlayerQuestState>,
    pub last_reset_dates: LastResetDates,
    pub current_streak: StreakCounters,
    pub unlocked_categories: Vec<QuestCategory>,
    pub quest_preferences: QuestPreferences,
}

impl Default for QuestSystemState {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestSystemState {
    /// A fresh state with every category unlocked.
    pub fn new() -> Self {
        Self {
            active_quests: Vec::new(),
            quest_history: Vec::new(),
            player_quest_states: HashMap::new(),
            last_reset_dates: LastResetDates::default(),
            current_streak: StreakCounters::default(),
            unlocked_categories: QuestCategory::all().to_vec(),
            quest_preferences: QuestPreferences::default(),
        }
    }

    pub fn contains_quest(&self, id: &QuestId) -> bool {
        self.active_quests.iter().any(|q| &q.id == id)
    }

    pub fn quest(&self, id: &QuestId) -> Option<&Quest> {
        self.active_quests.iter().find(|q| &q.id == id)
    }

    pub fn quest_mut(&mut self, id: &QuestId) -> Option<&mut Quest> {
        self.active_quests.iter_mut().find(|q| &q.id == id)
    }

    /// Active quests of one granularity, in insertion order.
    pub fn quests_of(&self, granularity: Granularity) -> Vec<&Quest> {
        self.active_quests
            .iter()
            .filter(|q| q.granularity == granularity)
            .collect()
    }

    /// Remove all active quests of one granularity together with their
    /// lifecycle records, returning the removed instances.
    pub fn remove_granularity(&mut self, granularity: Granularity) -> Vec<Quest> {
        let (removed, kept): (Vec<Quest>, Vec<Quest>) = self
            .active_quests
            .drain(..)
            .partition(|q| q.granularity == granularity);
        self.active_quests = kept;
        for quest in &removed {
            self.player_quest_states.remove(&quest.id);
        }
        removed
    }

    /// Template ids completed within the trailing window, used by the
    /// planner's history-avoidance filter.
    pub fn recently_completed_template_ids(
        &self,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> HashSet<TemplateId> {
        let cutoff = now - Duration::days(window_days);
        self.quest_history
            .iter()
            .filter(|entry| entry.completed_at >= cutoff)
            .map(|entry| entry.template_id.clone())
            .collect()
    }

    /// Lifetime completion count for a template across the ledger.
    pub fn completions_of_template(&self, template_id: &TemplateId) -> u32 {
        self.quest_history
            .iter()
            .filter(|entry| &entry.template_id == template_id)
            .count() as u32
    }

    /// Whether a template has ever been completed (prerequisite check).
    pub fn has_completed_template(&self, template_id: &TemplateId) -> bool {
        self.quest_history
            .iter()
            .any(|entry| &entry.template_id == template_id)
    }

    pub fn is_category_unlocked(&self, category: QuestCategory) -> bool {
        self.unlocked_categories.contains(&category)
    }
}
