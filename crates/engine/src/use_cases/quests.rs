//! The engine's exposed surface.
//!
//! One `QuestUseCases` per user-session context, constructed with its
//! collaborators injected; no global state, no ambient clock or entropy.

use std::sync::Arc;

use questforge_domain::{
    DomainError, GenerationConfig, Granularity, PlayerProgress, Quest, QuestHistoryEntry,
    QuestId, QuestSystemState,
};

use crate::infrastructure::ports::{ClockPort, TemplateCatalog};
use crate::use_cases::generation::{generate_into, GenerationPlanner};
use crate::use_cases::lifecycle::LifecycleTracker;
use crate::use_cases::progression::{ProgressionEngine, QuestReward};
use crate::use_cases::scheduling::{ResetFlags, ResetScheduler};

/// Facade over generation, scheduling, lifecycle, and progression.
///
/// Every method takes the aggregate by value and returns the updated
/// state; persistence of the result belongs to the caller, which also
/// serializes read-modify-write cycles per user.
pub struct QuestUseCases {
    clock: Arc<dyn ClockPort>,
    config: GenerationConfig,
    planner: GenerationPlanner,
    scheduler: ResetScheduler,
}

impl QuestUseCases {
    /// Validates the configuration up front; an unusable config is fatal,
    /// not discovered mid-generation.
    pub fn new(
        clock: Arc<dyn ClockPort>,
        catalog: Arc<dyn TemplateCatalog>,
        config: GenerationConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let planner = GenerationPlanner::new(catalog);
        let scheduler = ResetScheduler::new(clock.clone(), planner.clone());
        Ok(Self {
            clock,
            config,
            planner,
            scheduler,
        })
    }

    /// Build one granularity's quest set and merge it into the state.
    pub fn generate_for_granularity(
        &self,
        mut state: QuestSystemState,
        granularity: Granularity,
        player_level: u32,
    ) -> Result<(QuestSystemState, Vec<Quest>), DomainError> {
        let new_quests = generate_into(
            &self.planner,
            &mut state,
            granularity,
            player_level,
            &self.config,
            self.clock.now(),
        )?;
        Ok((state, new_quests))
    }

    /// Regenerate every stale granularity; a fresh state passes through
    /// untouched.
    pub fn check_and_reset(
        &self,
        state: QuestSystemState,
        player_level: u32,
    ) -> Result<(QuestSystemState, ResetFlags, Vec<Quest>), DomainError> {
        self.scheduler
            .check_and_reset(state, player_level, &self.config)
    }

    /// Mark a quest as actively worked on.
    pub fn start(
        &self,
        mut state: QuestSystemState,
        quest_id: &QuestId,
    ) -> Result<QuestSystemState, DomainError> {
        LifecycleTracker::start(&mut state, quest_id, self.clock.now())?;
        Ok(state)
    }

    /// Record a completion step; `None` entry means the quest was already
    /// complete and nothing changed.
    pub fn complete(
        &self,
        mut state: QuestSystemState,
        quest_id: &QuestId,
        time_spent_minutes: Option<u32>,
    ) -> Result<(QuestSystemState, Option<QuestHistoryEntry>), DomainError> {
        let entry =
            LifecycleTracker::complete(&mut state, quest_id, self.clock.now(), time_spent_minutes)?;
        Ok((state, entry))
    }

    /// Skip a quest for this cycle.
    pub fn skip(
        &self,
        mut state: QuestSystemState,
        quest_id: &QuestId,
    ) -> Result<QuestSystemState, DomainError> {
        LifecycleTracker::skip(&mut state, quest_id)?;
        Ok(state)
    }

    /// Sweep overdue instances into `expired`.
    pub fn expire_overdue(&self, mut state: QuestSystemState) -> (QuestSystemState, Vec<QuestId>) {
        let expired = LifecycleTracker::expire_overdue(&mut state, self.clock.now());
        (state, expired)
    }

    /// Compute and apply the reward for a completed quest.
    ///
    /// The streak count comes from the state's counters for the quest's
    /// granularity; pass the progress back to persistence alongside the
    /// state.
    pub fn apply_reward(
        &self,
        progress: PlayerProgress,
        quest: &Quest,
        state: &QuestSystemState,
        completion_time_minutes: Option<u32>,
    ) -> (PlayerProgress, QuestReward) {
        let streak = state.current_streak.get(quest.granularity);
        let reward = ProgressionEngine::reward(
            quest,
            progress.level,
            completion_time_minutes,
            ProgressionEngine::streak_multiplier(streak),
        );
        let (progress, _levels_gained) = ProgressionEngine::apply_reward(progress, reward);
        (progress, reward)
    }
}
