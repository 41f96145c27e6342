//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Ports exist for:
//! - The template catalog (could swap static data -> database)
//! - Persistence of per-user state (owned by the calling layer)
//! - Clock (for testing calendar boundaries)
//!
//! All ports are synchronous: the core is a pure function of its inputs
//! and performs no blocking I/O, locking, or retries itself. The calling
//! layer resolves any real I/O before invoking the engine.

use chrono::{DateTime, NaiveDate, Utc};

use questforge_domain::{
    Granularity, QuestCategory, QuestSystemState, QuestTemplate, UserId,
};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// Template Catalog Port
// =============================================================================

/// Filter for catalog queries; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateFilter {
    pub granularity: Option<Granularity>,
    pub category: Option<QuestCategory>,
    /// Upper bound on `level_requirement`.
    pub max_level: Option<u32>,
    /// Month number (1-12) that must be in season.
    pub month: Option<u32>,
}

impl TemplateFilter {
    pub fn for_granularity(granularity: Granularity) -> Self {
        Self {
            granularity: Some(granularity),
            ..Self::default()
        }
    }

    pub fn with_max_level(mut self, level: u32) -> Self {
        self.max_level = Some(level);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }
}

/// Read-only access to the quest template catalog.
pub trait TemplateCatalog: Send + Sync {
    /// Templates matching the filter, in stable catalog order.
    fn list_templates(&self, filter: &TemplateFilter) -> Vec<QuestTemplate>;
}

// =============================================================================
// Persistence Port
// =============================================================================

/// Persistence of per-user quest state.
///
/// The engine core never calls this; it exists for the orchestrating
/// caller, which owns the read-modify-write cycle and whatever
/// backup-before-write policy the backend enforces.
pub trait QuestStateStore: Send + Sync {
    fn load(&self, user_id: UserId) -> Result<Option<QuestSystemState>, StoreError>;
    fn save(&self, user_id: UserId, state: &QuestSystemState) -> Result<(), StoreError>;
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn today(&self) -> NaiveDate;
}
