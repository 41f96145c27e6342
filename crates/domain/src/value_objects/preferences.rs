use serde::{Deserialize, Serialize};

use super::QuestCategory;

/// Player taste settings consulted during selection.
///
/// Preferred categories get a weight boost, avoided ones are dampened but
/// never excluded outright, and a difficulty preference nudges picks
/// toward that rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestPreferences {
    pub preferred_categories: Vec<QuestCategory>,
    pub avoided_categories: Vec<QuestCategory>,
    /// Preferred difficulty rating, 1-5.
    pub difficulty_preference: Option<u8>,
}

impl QuestPreferences {
    pub fn prefers(&self, category: QuestCategory) -> bool {
        self.preferred_categories.contains(&category)
    }

    pub fn avoids(&self, category: QuestCategory) -> bool {
        self.avoided_categories.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_opinions() {
        let prefs = QuestPreferences::default();
        assert!(!prefs.prefers(QuestCategory::Health));
        assert!(!prefs.avoids(QuestCategory::Health));
        assert!(prefs.difficulty_preference.is_none());
    }
}
