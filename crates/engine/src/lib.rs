//! QuestForge engine library.
//!
//! The quest generation and scheduling engine: deterministic seeded
//! selection of balanced quest sets per time granularity, calendar-boundary
//! reset scheduling, the per-instance lifecycle state machine, and XP
//! reward computation with level-up resolution.
//!
//! ## Structure
//!
//! - `selection/` - seeded PRNG and weighted sampling
//! - `use_cases/` - generation, scheduling, lifecycle, progression
//! - `infrastructure/` - ports (clock, catalog, persistence) + in-memory
//!   adapters
//!
//! The engine is synchronous and single-writer per user: every operation
//! is a pure function of `(state, clock, catalog, config)` and returns the
//! updated state for the caller to persist.

pub mod infrastructure;
pub mod selection;
pub mod use_cases;

pub use use_cases::QuestUseCases;
