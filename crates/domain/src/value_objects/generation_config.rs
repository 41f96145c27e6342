use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Granularity, QuestCategory};
use crate::error::DomainError;

/// Target instance counts per granularity.
///
/// One named field per granularity, selected via explicit `match`; counts
/// are unsigned so a negative target is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestCounts {
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
    pub special: u32,
}

impl Default for QuestCounts {
    fn default() -> Self {
        Self {
            daily: 3,
            weekly: 3,
            monthly: 2,
            special: 1,
        }
    }
}

impl QuestCounts {
    pub fn for_granularity(&self, granularity: Granularity) -> u32 {
        match granularity {
            Granularity::Daily => self.daily,
            Granularity::Weekly => self.weekly,
            Granularity::Monthly => self.monthly,
            Granularity::Special => self.special,
        }
    }
}

/// One rung of the difficulty ladder: from `min_level` upward, templates
/// rated above `max_difficulty` are filtered out when generation adapts to
/// player level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyCap {
    pub min_level: u32,
    pub max_difficulty: u8,
}

/// Tuning knobs for quest set generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub quest_counts: QuestCounts,
    /// Ascending ladder of level thresholds to difficulty caps.
    pub max_difficulty_per_level: Vec<DifficultyCap>,
    /// Per-category selection weight multipliers; categories absent from
    /// the map weigh 1.0.
    pub category_balance: HashMap<QuestCategory, f64>,
    /// Never pick the same category twice before all categories are used.
    pub ensure_variety: bool,
    /// Exclude templates completed within the granularity's history window.
    pub consider_player_history: bool,
    /// Apply level gating and the difficulty ladder.
    pub adapt_to_player_level: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            quest_counts: QuestCounts::default(),
            max_difficulty_per_level: vec![
                DifficultyCap {
                    min_level: 1,
                    max_difficulty: 2,
                },
                DifficultyCap {
                    min_level: 3,
                    max_difficulty: 3,
                },
                DifficultyCap {
                    min_level: 6,
                    max_difficulty: 4,
                },
                DifficultyCap {
                    min_level: 10,
                    max_difficulty: 5,
                },
            ],
            category_balance: HashMap::new(),
            ensure_variety: true,
            consider_player_history: true,
            adapt_to_player_level: true,
        }
    }
}

impl GenerationConfig {
    /// The category set generation iterates over, in canonical order.
    ///
    /// An empty balance map means every category participates. The order
    /// is deterministic; the planner shuffles it with the seeded
    /// generator.
    pub fn categories(&self) -> Vec<QuestCategory> {
        if self.category_balance.is_empty() {
            return QuestCategory::all().to_vec();
        }
        let mut categories: Vec<QuestCategory> =
            self.category_balance.keys().copied().collect();
        categories.sort();
        categories
    }

    pub fn balance_for(&self, category: QuestCategory) -> f64 {
        self.category_balance.get(&category).copied().unwrap_or(1.0)
    }

    /// Highest template difficulty allowed at the given player level.
    pub fn max_difficulty_for(&self, player_level: u32) -> u8 {
        let mut cap = 5;
        for rung in &self.max_difficulty_per_level {
            if player_level >= rung.min_level {
                cap = rung.max_difficulty;
            }
        }
        cap
    }

    /// Fatal configuration checks; surfaced immediately, never recovered.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (category, weight) in &self.category_balance {
            if !(weight.is_finite() && *weight > 0.0) {
                return Err(DomainError::invalid_configuration(format!(
                    "category balance for {} must be a positive finite number, got {}",
                    category, weight
                )));
            }
        }
        let mut previous_level = 0;
        for rung in &self.max_difficulty_per_level {
            if !(1..=5).contains(&rung.max_difficulty) {
                return Err(DomainError::invalid_configuration(format!(
                    "difficulty cap must be 1-5, got {}",
                    rung.max_difficulty
                )));
            }
            if rung.min_level <= previous_level {
                return Err(DomainError::invalid_configuration(
                    "difficulty ladder levels must be strictly ascending",
                ));
            }
            previous_level = rung.min_level;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn counts_select_by_granularity() {
        let counts = QuestCounts::default();
        assert_eq!(counts.for_granularity(Granularity::Daily), 3);
        assert_eq!(counts.for_granularity(Granularity::Special), 1);
    }

    #[test]
    fn empty_balance_means_all_categories() {
        let config = GenerationConfig::default();
        assert_eq!(config.categories().len(), 8);
        assert_eq!(config.balance_for(QuestCategory::Health), 1.0);
    }

    #[test]
    fn balance_keys_come_back_sorted() {
        let mut config = GenerationConfig::default();
        config.category_balance.insert(QuestCategory::Social, 2.0);
        config.category_balance.insert(QuestCategory::Health, 0.5);
        assert_eq!(
            config.categories(),
            vec![QuestCategory::Health, QuestCategory::Social]
        );
    }

    #[test]
    fn difficulty_ladder_walks_upward() {
        let config = GenerationConfig::default();
        assert_eq!(config.max_difficulty_for(1), 2);
        assert_eq!(config.max_difficulty_for(2), 2);
        assert_eq!(config.max_difficulty_for(3), 3);
        assert_eq!(config.max_difficulty_for(9), 4);
        assert_eq!(config.max_difficulty_for(40), 5);
    }

    #[test]
    fn validate_rejects_bad_balance_weight() {
        let mut config = GenerationConfig::default();
        config.category_balance.insert(QuestCategory::Health, 0.0);
        assert!(matches!(
            config.validate(),
            Err(DomainError::InvalidConfiguration(_))
        ));

        config.category_balance.insert(QuestCategory::Health, f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unordered_ladder() {
        let mut config = GenerationConfig::default();
        config.max_difficulty_per_level = vec![
            DifficultyCap {
                min_level: 5,
                max_difficulty: 3,
            },
            DifficultyCap {
                min_level: 2,
                max_difficulty: 4,
            },
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_cap() {
        let mut config = GenerationConfig::default();
        config.max_difficulty_per_level = vec![DifficultyCap {
            min_level: 1,
            max_difficulty: 6,
        }];
        assert!(config.validate().is_err());
    }
}
