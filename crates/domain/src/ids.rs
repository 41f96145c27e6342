use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::Granularity;

/// Identifies the user owning a `QuestSystemState`.
///
/// The engine never mints these; they arrive from the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Identifies a quest template in the catalog.
///
/// Template ids are human-readable slugs owned by the catalog data, not
/// generated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TemplateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifies a materialized quest instance.
///
/// Derived deterministically from template, granularity, and start date so
/// the same template+day combination is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestId(String);

impl QuestId {
    /// Derive the stable instance id: `{templateId}_{granularity}_{ISO date}`.
    pub fn derive(template: &TemplateId, granularity: Granularity, date: NaiveDate) -> Self {
        Self(format!(
            "{}_{}_{}",
            template.as_str(),
            granularity.token(),
            date.format("%Y-%m-%d")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quest_id_derivation_is_stable() {
        let template = TemplateId::new("water");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let id = QuestId::derive(&template, Granularity::Daily, date);
        assert_eq!(id.as_str(), "water_daily_2024-03-01");

        let again = QuestId::derive(&template, Granularity::Daily, date);
        assert_eq!(id, again);
    }

    #[test]
    fn quest_id_varies_by_granularity_and_date() {
        let template = TemplateId::new("water");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let daily = QuestId::derive(&template, Granularity::Daily, date);
        let weekly = QuestId::derive(&template, Granularity::Weekly, date);
        let next_day = QuestId::derive(
            &template,
            Granularity::Daily,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        );
        assert_ne!(daily, weekly);
        assert_ne!(daily, next_day);
    }

    #[test]
    fn user_ids_are_unique() {
        assert_ne!(UserId::new(), UserId::new());
    }
}
