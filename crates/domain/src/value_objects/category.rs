use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Category a quest template belongs to.
///
/// Categories drive variety balancing during generation and carry a small
/// XP multiplier so effortful categories pay slightly more.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    Health,
    Fitness,
    Learning,
    Productivity,
    Social,
    Creativity,
    Mindfulness,
    Household,
}

impl QuestCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            QuestCategory::Health => "Health",
            QuestCategory::Fitness => "Fitness",
            QuestCategory::Learning => "Learning",
            QuestCategory::Productivity => "Productivity",
            QuestCategory::Social => "Social",
            QuestCategory::Creativity => "Creativity",
            QuestCategory::Mindfulness => "Mindfulness",
            QuestCategory::Household => "Household",
        }
    }

    /// Stable lowercase token, used in tags and serialized state.
    pub fn token(&self) -> &'static str {
        match self {
            QuestCategory::Health => "health",
            QuestCategory::Fitness => "fitness",
            QuestCategory::Learning => "learning",
            QuestCategory::Productivity => "productivity",
            QuestCategory::Social => "social",
            QuestCategory::Creativity => "creativity",
            QuestCategory::Mindfulness => "mindfulness",
            QuestCategory::Household => "household",
        }
    }

    /// Returns all categories in canonical order.
    ///
    /// The order is stable across runs; selection code shuffles it with the
    /// seeded generator rather than relying on map iteration order.
    pub fn all() -> [QuestCategory; 8] {
        [
            QuestCategory::Health,
            QuestCategory::Fitness,
            QuestCategory::Learning,
            QuestCategory::Productivity,
            QuestCategory::Social,
            QuestCategory::Creativity,
            QuestCategory::Mindfulness,
            QuestCategory::Household,
        ]
    }

    /// XP multiplier applied to rewards for quests of this category.
    pub fn xp_multiplier(&self) -> f64 {
        match self {
            QuestCategory::Health => 1.0,
            QuestCategory::Fitness => 1.1,
            QuestCategory::Learning => 1.2,
            QuestCategory::Productivity => 1.1,
            QuestCategory::Social => 1.05,
            QuestCategory::Creativity => 1.1,
            QuestCategory::Mindfulness => 1.0,
            QuestCategory::Household => 1.05,
        }
    }
}

impl fmt::Display for QuestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for QuestCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "health" => Ok(QuestCategory::Health),
            "fitness" => Ok(QuestCategory::Fitness),
            "learning" => Ok(QuestCategory::Learning),
            "productivity" => Ok(QuestCategory::Productivity),
            "social" => Ok(QuestCategory::Social),
            "creativity" => Ok(QuestCategory::Creativity),
            "mindfulness" => Ok(QuestCategory::Mindfulness),
            "household" => Ok(QuestCategory::Household),
            other => Err(DomainError::parse(format!(
                "Unknown quest category: '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_through_from_str() {
        for c in QuestCategory::all() {
            assert_eq!(c.token().parse::<QuestCategory>().unwrap(), c);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!(matches!(
            "finance".parse::<QuestCategory>(),
            Err(DomainError::Parse(_))
        ));
    }

    #[test]
    fn all_has_eight_distinct_categories() {
        let all = QuestCategory::all();
        assert_eq!(all.len(), 8);
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn multipliers_are_modest() {
        for c in QuestCategory::all() {
            let m = c.xp_multiplier();
            assert!((1.0..=1.2).contains(&m));
        }
    }
}
