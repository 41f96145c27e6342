//! In-memory state store adapter.

use dashmap::DashMap;

use questforge_domain::{QuestSystemState, UserId};

use crate::infrastructure::ports::{QuestStateStore, StoreError};

/// Store backed by a concurrent map; unrelated users can load and save
/// concurrently without coordinating. Within one user the caller still
/// owns the read-modify-write cycle.
#[derive(Default)]
pub struct InMemoryStateStore {
    states: DashMap<UserId, QuestSystemState>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl QuestStateStore for InMemoryStateStore {
    fn load(&self, user_id: UserId) -> Result<Option<QuestSystemState>, StoreError> {
        Ok(self.states.get(&user_id).map(|entry| entry.value().clone()))
    }

    fn save(&self, user_id: UserId, state: &QuestSystemState) -> Result<(), StoreError> {
        self.states.insert(user_id, state.clone());
        Ok(())
    }
}
