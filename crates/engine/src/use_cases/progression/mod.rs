//! Reward computation and level-up resolution.

use serde::{Deserialize, Serialize};

use questforge_domain::{PlayerProgress, Quest};

/// XP breakdown for one completed quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestReward {
    pub base_xp: u32,
    /// Difference between the multiplied total and the base; negative when
    /// a slow completion dampened the reward.
    pub bonus_xp: i32,
    pub total_xp: u32,
}

/// Turns completed quests into XP and levels.
///
/// `total = base * category * granularity * levelScaling * timeBonus *
/// streak`, rounded to the nearest integer.
pub struct ProgressionEngine;

impl ProgressionEngine {
    /// Compute the reward for a completed quest.
    pub fn reward(
        quest: &Quest,
        player_level: u32,
        completion_time_minutes: Option<u32>,
        streak_multiplier: f64,
    ) -> QuestReward {
        let base_xp = quest.xp;
        let multiplied = f64::from(base_xp)
            * quest.category.xp_multiplier()
            * quest.granularity.xp_multiplier()
            * Self::level_scaling(player_level)
            * Self::time_bonus(quest.time_limit_minutes, completion_time_minutes)
            * streak_multiplier;
        let total_xp = multiplied.round().max(0.0) as u32;

        QuestReward {
            base_xp,
            bonus_xp: total_xp as i32 - base_xp as i32,
            total_xp,
        }
    }

    /// Apply a reward to the player's progress, resolving level-ups.
    pub fn apply_reward(mut progress: PlayerProgress, reward: QuestReward) -> (PlayerProgress, u32) {
        let levels_gained = progress.apply_xp(reward.total_xp);
        if levels_gained > 0 {
            tracing::info!(
                level = progress.level,
                levels_gained,
                "player leveled up"
            );
        }
        (progress, levels_gained)
    }

    /// Streak bonus: +5% per consecutive period, capped at +50%.
    pub fn streak_multiplier(streak: u32) -> f64 {
        (1.0 + f64::from(streak) * 0.05).min(1.5)
    }

    /// Higher-level players earn slightly more, capped at +50%.
    fn level_scaling(player_level: u32) -> f64 {
        (1.0 + f64::from(player_level.saturating_sub(1)) * 0.02).min(1.5)
    }

    /// Fast completions earn +20%, slow ones lose 10%; no time limit, no
    /// adjustment.
    fn time_bonus(time_limit_minutes: Option<u32>, completion_time_minutes: Option<u32>) -> f64 {
        let (Some(limit), Some(completion)) = (time_limit_minutes, completion_time_minutes) else {
            return 1.0;
        };
        let limit = f64::from(limit);
        let completion = f64::from(completion);
        if completion < 0.5 * limit {
            1.2
        } else if completion > 0.9 * limit {
            0.9
        } else {
            1.0
        }
    }
}
