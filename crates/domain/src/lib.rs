//! QuestForge domain layer.
//!
//! Pure domain types for the quest generation and scheduling engine:
//! catalog templates, materialized quest instances, the per-user aggregate,
//! and the value objects that parameterize generation. No I/O, no clock
//! access, no entropy: time and randomness are always passed in by the
//! engine layer.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    EventWindow, LastResetDates, PlayerQuestState, Quest, QuestHistoryEntry, QuestStatus,
    QuestSystemState, QuestTemplate, QuestVariation, StreakCounters,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{QuestId, TemplateId, UserId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    DifficultyCap, GenerationConfig, Granularity, PlayerProgress, QuestCategory, QuestCounts,
    QuestPreferences,
};
