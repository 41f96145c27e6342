//! Unified error types for the domain layer
//!
//! Provides a common error type used across all engine operations, enabling
//! consistent error handling without forcing callers to use String or anyhow.

use chrono::NaiveDate;
use thiserror::Error;

use crate::entities::QuestStatus;
use crate::value_objects::Granularity;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generation configuration is unusable; fatal, surfaced immediately
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Quest instance id is absent from the active set
    #[error("Quest not found: {id}")]
    QuestNotFound { id: String },

    /// A recorded reset date lies in the future relative to the clock.
    /// Reported, never auto-corrected.
    #[error("Stale state: {granularity} reset recorded on {recorded} but today is {today}")]
    StaleState {
        granularity: Granularity,
        recorded: NaiveDate,
        today: NaiveDate,
    },

    /// State transition not allowed
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: QuestStatus, to: QuestStatus },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// - Required fields are empty or missing
    /// - Values are outside allowed ranges
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a quest not found error
    pub fn quest_not_found(id: impl Into<String>) -> Self {
        Self::QuestNotFound { id: id.into() }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(from: QuestStatus, to: QuestStatus) -> Self {
        Self::InvalidStateTransition { from, to }
    }
}
