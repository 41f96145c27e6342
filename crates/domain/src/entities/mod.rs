//! Entities: identified domain objects with lifecycles.

mod history;
mod player_state;
mod quest;
mod system_state;
mod template;

pub use history::QuestHistoryEntry;
pub use player_state::{PlayerQuestState, QuestStatus};
pub use quest::Quest;
pub use system_state::{LastResetDates, QuestSystemState, StreakCounters};
pub use template::{EventWindow, QuestTemplate, QuestVariation};
