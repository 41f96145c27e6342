//! Quest set generation: planning plus materialization.

mod factory;
mod planner;

pub use factory::{choose_variation, QuestInstanceFactory};
pub use planner::{GenerationPlanner, PlanOutcome};

use chrono::{DateTime, Utc};

use questforge_domain::{
    DomainError, GenerationConfig, Granularity, PlayerQuestState, Quest, QuestSystemState,
};

use crate::selection::{Seed, SeededRng};

/// Plan and materialize one granularity's quest set into the state.
///
/// The seed derives from the generation date plus the granularity token,
/// so each granularity gets an independent but fully reproducible
/// sequence. Instances whose derived id is already live are skipped,
/// making repeat calls on the same day idempotent. The granularity's
/// last-reset date is stamped with the generation date.
pub fn generate_into(
    planner: &GenerationPlanner,
    state: &mut QuestSystemState,
    granularity: Granularity,
    player_level: u32,
    config: &GenerationConfig,
    now: DateTime<Utc>,
) -> Result<Vec<Quest>, DomainError> {
    let date_str = now.date_naive().format("%Y-%m-%d").to_string();
    let seed = Seed::from_date_str(&format!("{}:{}", date_str, granularity.token()));
    let mut rng = SeededRng::new(seed);

    let count = config.quest_counts.for_granularity(granularity);
    let outcome = planner.plan(granularity, count, config, player_level, state, now, &mut rng);

    let mut new_quests = Vec::new();
    for template in &outcome.templates {
        let variation = choose_variation(template, &mut rng);
        let quest =
            QuestInstanceFactory::materialize(template, variation, granularity, now, &mut rng)?;
        if state.contains_quest(&quest.id) {
            continue;
        }
        state
            .player_quest_states
            .insert(quest.id.clone(), PlayerQuestState::new(quest.id.clone()));
        state.active_quests.push(quest.clone());
        new_quests.push(quest);
    }

    state.last_reset_dates.set(granularity, now.date_naive());
    Ok(new_quests)
}
