//! In-process voter storage.
//!
//! A [`BTreeMap`] keyed by [`VoterId`] behind a single reader/writer lock.
//! Mutations take the write lock for their whole duration, so readers never
//! observe a half-applied change and listing never races a delete.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tokio::sync::RwLock;
use voter_types::{VoterId, VoterRecord};

use crate::error::StoreError;

/// Process-local voter storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    voters: Arc<RwLock<BTreeMap<VoterId, VoterRecord>>>,
}

impl MemoryBackend {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `voter` unless its id is already present.
    pub(crate) async fn add(&self, voter: VoterRecord) -> Result<(), StoreError> {
        let mut voters = self.voters.write().await;
        match voters.entry(voter.voter_id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(voter.voter_id)),
            Entry::Vacant(slot) => {
                slot.insert(voter);
                Ok(())
            }
        }
    }

    /// Return a copy of the voter stored under `voter_id`.
    pub(crate) async fn get(&self, voter_id: VoterId) -> Result<VoterRecord, StoreError> {
        self.voters
            .read()
            .await
            .get(&voter_id)
            .cloned()
            .ok_or(StoreError::NotFound(voter_id))
    }

    /// Replace an existing voter wholesale.
    pub(crate) async fn update(&self, voter: VoterRecord) -> Result<(), StoreError> {
        let mut voters = self.voters.write().await;
        let stored = voters
            .get_mut(&voter.voter_id)
            .ok_or(StoreError::NotFound(voter.voter_id))?;
        *stored = voter;
        Ok(())
    }

    /// Remove the voter stored under `voter_id`.
    pub(crate) async fn delete(&self, voter_id: VoterId) -> Result<(), StoreError> {
        self.voters
            .write()
            .await
            .remove(&voter_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(voter_id))
    }

    /// Remove every voter, returning how many were removed.
    pub(crate) async fn delete_all(&self) -> usize {
        let mut voters = self.voters.write().await;
        let removed = voters.len();
        voters.clear();
        removed
    }

    /// Copies of every stored voter, ordered by id.
    pub(crate) async fn list_all(&self) -> Vec<VoterRecord> {
        self.voters.read().await.values().cloned().collect()
    }

    /// Set `is_done` on a stored voter in place.
    pub(crate) async fn set_done(&self, voter_id: VoterId, is_done: bool) -> Result<(), StoreError> {
        let mut voters = self.voters.write().await;
        let stored = voters
            .get_mut(&voter_id)
            .ok_or(StoreError::NotFound(voter_id))?;
        stored.is_done = is_done;
        Ok(())
    }

    /// Number of stored voters.
    pub async fn len(&self) -> usize {
        self.voters.read().await.len()
    }

    /// Whether no voters are stored.
    pub async fn is_empty(&self) -> bool {
        self.voters.read().await.is_empty()
    }
}
