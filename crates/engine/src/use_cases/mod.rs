//! Use cases - the engine's operations.
//!
//! Each module owns one concern of the quest pipeline; `quests` is the
//! injected facade callers construct per user-session context.

pub mod generation;
pub mod lifecycle;
pub mod progression;
pub mod quests;
pub mod scheduling;

pub use generation::{GenerationPlanner, PlanOutcome, QuestInstanceFactory};
pub use lifecycle::LifecycleTracker;
pub use progression::{ProgressionEngine, QuestReward};
pub use quests::QuestUseCases;
pub use scheduling::{ResetFlags, ResetScheduler};
