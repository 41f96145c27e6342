//! The per-instance lifecycle state machine.
//!
//! available -> active -> completed, with skips from any non-terminal
//! state and expiry once the time window passes. Terminal instances stay
//! terminal; a new cycle always goes through a newly materialized
//! instance.

use chrono::{DateTime, Utc};

use questforge_domain::{
    DomainError, PlayerQuestState, QuestHistoryEntry, QuestId, QuestStatus, QuestSystemState,
};

/// Owns status transitions and the completion ledger.
///
/// Stateless: every method takes the aggregate and the current instant so
/// the tracker itself never touches a clock.
pub struct LifecycleTracker;

impl LifecycleTracker {
    /// available -> active. Starting twice is a no-op.
    pub fn start(
        state: &mut QuestSystemState,
        quest_id: &QuestId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if !state.contains_quest(quest_id) {
            return Err(DomainError::quest_not_found(quest_id.as_str()));
        }
        let record = state
            .player_quest_states
            .entry(quest_id.clone())
            .or_insert_with(|| PlayerQuestState::new(quest_id.clone()));
        match record.status {
            QuestStatus::Active => Ok(()),
            QuestStatus::Available => {
                record.status = QuestStatus::Active;
                record.started_at = Some(now);
                tracing::debug!(quest_id = %quest_id, "quest started");
                Ok(())
            }
            from => Err(DomainError::invalid_state_transition(
                from,
                QuestStatus::Active,
            )),
        }
    }

    /// Record one completion step.
    ///
    /// Returns the ledger entry written for this step, or `None` when the
    /// instance was already completed (idempotent: no duplicate ledger
    /// entry, no second XP basis). Bounded instances only reach
    /// `completed` once `max_completions` steps are recorded.
    pub fn complete(
        state: &mut QuestSystemState,
        quest_id: &QuestId,
        now: DateTime<Utc>,
        time_spent_minutes: Option<u32>,
    ) -> Result<Option<QuestHistoryEntry>, DomainError> {
        if !state.contains_quest(quest_id) {
            return Err(DomainError::quest_not_found(quest_id.as_str()));
        }

        let status = state
            .player_quest_states
            .get(quest_id)
            .map(|r| r.status)
            .unwrap_or(QuestStatus::Available);
        match status {
            QuestStatus::Completed => return Ok(None),
            QuestStatus::Expired | QuestStatus::Skipped => {
                return Err(DomainError::invalid_state_transition(
                    status,
                    QuestStatus::Completed,
                ));
            }
            QuestStatus::Available | QuestStatus::Active => {}
        }

        let (entry, fully_complete, progress, completions) = {
            let Some(quest) = state.quest_mut(quest_id) else {
                return Err(DomainError::quest_not_found(quest_id.as_str()));
            };
            let fully_complete = quest.record_completion(now);
            let entry = QuestHistoryEntry::new(
                quest.id.clone(),
                quest.template_id.clone(),
                now,
                quest.xp,
                time_spent_minutes,
            );
            (entry, fully_complete, quest.progress, quest.current_completions)
        };

        let record = state
            .player_quest_states
            .entry(quest_id.clone())
            .or_insert_with(|| PlayerQuestState::new(quest_id.clone()));
        record.progress = progress;
        record.current_completions = completions;
        record.time_spent_minutes = record
            .time_spent_minutes
            .saturating_add(time_spent_minutes.unwrap_or(0));
        if record.started_at.is_none() {
            record.started_at = Some(now);
        }
        if fully_complete {
            record.status = QuestStatus::Completed;
            record.completed_at = Some(now);
        } else {
            record.status = QuestStatus::Active;
        }

        tracing::debug!(
            quest_id = %quest_id,
            fully_complete,
            progress,
            "quest completion recorded"
        );
        state.quest_history.push(entry.clone());
        Ok(Some(entry))
    }

    /// available|active -> skipped.
    pub fn skip(state: &mut QuestSystemState, quest_id: &QuestId) -> Result<(), DomainError> {
        if !state.contains_quest(quest_id) {
            return Err(DomainError::quest_not_found(quest_id.as_str()));
        }
        let record = state
            .player_quest_states
            .entry(quest_id.clone())
            .or_insert_with(|| PlayerQuestState::new(quest_id.clone()));
        if !record.status.can_transition_to(QuestStatus::Skipped) {
            return Err(DomainError::invalid_state_transition(
                record.status,
                QuestStatus::Skipped,
            ));
        }
        record.status = QuestStatus::Skipped;
        tracing::debug!(quest_id = %quest_id, "quest skipped");
        Ok(())
    }

    /// Sweep every non-terminal instance whose window has passed into
    /// `expired`, returning the affected ids. Expired instances stay in
    /// the active set until the scheduler removes them at the boundary.
    pub fn expire_overdue(state: &mut QuestSystemState, now: DateTime<Utc>) -> Vec<QuestId> {
        let mut expired = Vec::new();
        for quest in &state.active_quests {
            if !quest.is_expired(now) {
                continue;
            }
            let status = state
                .player_quest_states
                .get(&quest.id)
                .map(|r| r.status)
                .unwrap_or(QuestStatus::Available);
            if !status.is_terminal() {
                expired.push(quest.id.clone());
            }
        }
        for id in &expired {
            let record = state
                .player_quest_states
                .entry(id.clone())
                .or_insert_with(|| PlayerQuestState::new(id.clone()));
            record.status = QuestStatus::Expired;
        }
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "expired overdue quests");
        }
        expired
    }
}
