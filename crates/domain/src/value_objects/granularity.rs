use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The reset period of a quest set.
///
/// Daily, weekly, and monthly sets roll over on calendar boundaries;
/// special quests are driven by explicit event windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Special,
}

impl Granularity {
    pub fn display_name(&self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
            Granularity::Special => "Special",
        }
    }

    /// Stable lowercase token, used in derived quest ids and tags.
    pub fn token(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Special => "special",
        }
    }

    /// Returns all granularities in reset-check order.
    pub fn all() -> [Granularity; 4] {
        [
            Granularity::Daily,
            Granularity::Weekly,
            Granularity::Monthly,
            Granularity::Special,
        ]
    }

    /// How far back the planner looks when excluding recently completed
    /// templates from a new quest set.
    pub fn history_window_days(&self) -> i64 {
        match self {
            Granularity::Daily => 3,
            Granularity::Weekly => 14,
            Granularity::Monthly => 30,
            Granularity::Special => 30,
        }
    }

    /// XP multiplier applied to rewards for this granularity.
    ///
    /// Longer commitment periods pay out more per quest.
    pub fn xp_multiplier(&self) -> f64 {
        match self {
            Granularity::Daily => 1.0,
            Granularity::Weekly => 1.5,
            Granularity::Monthly => 2.0,
            Granularity::Special => 2.5,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Granularity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            "special" => Ok(Granularity::Special),
            other => Err(DomainError::parse(format!(
                "Unknown granularity: '{}'",
                other
            ))),
        }
    }
}
