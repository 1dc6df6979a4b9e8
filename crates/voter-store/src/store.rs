//! The voter store: record lifecycle and poll-history queries.
//!
//! [`VoterStore`] is the only authority over voter records. It is
//! backend-agnostic: every operation behaves the same over the in-memory
//! map and over `Dragonfly`, including failing with
//! [`StoreError::NotFound`] when deleting an id that is not stored.
//!
//! Records go in and come out by value. The store never keeps a reference
//! into caller memory and callers never get one into the store.

use std::sync::Arc;

use tracing::{debug, info, warn};
use voter_types::{PollEntry, PollId, VoterId, VoterRecord};

use crate::backend::VoterBackend;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::memory::MemoryBackend;
use crate::metrics::StoreMetrics;

/// Entity store for voter records.
///
/// Cheap to clone; clones share the same backend and metrics.
#[derive(Clone)]
pub struct VoterStore {
    backend: VoterBackend,
    metrics: Option<Arc<StoreMetrics>>,
}

impl VoterStore {
    /// Wrap an already-built backend.
    pub const fn new(backend: VoterBackend) -> Self {
        Self {
            backend,
            metrics: None,
        }
    }

    /// An empty store backed by the in-memory map.
    pub fn in_memory() -> Self {
        Self::new(VoterBackend::Memory(MemoryBackend::new()))
    }

    /// Build the store selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the configured backend cannot be reached.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let backend = VoterBackend::from_config(config).await?;
        info!(backend = backend.name(), "Voter store ready");
        Ok(Self::new(backend))
    }

    /// Record every operation's outcome in `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<StoreMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Name of the active backend (`memory` or `dragonfly`).
    pub const fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the remote backend does not answer.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.observe(self.backend.ping().await)
    }

    fn observe<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if let Some(metrics) = &self.metrics {
            metrics.record(result.is_ok());
        }
        result
    }

    /// Insert a new voter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the id is already stored.
    pub async fn add_voter(&self, voter: VoterRecord) -> Result<(), StoreError> {
        warn_on_foreign_history(&voter);
        let voter_id = voter.voter_id;
        let result = self.backend.add(voter).await;
        if result.is_ok() {
            debug!(%voter_id, backend = self.backend.name(), "Voter added");
        }
        self.observe(result)
    }

    /// Return a copy of the stored voter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is not stored.
    pub async fn get_voter(&self, voter_id: VoterId) -> Result<VoterRecord, StoreError> {
        self.observe(self.backend.get(voter_id).await)
    }

    /// Replace a stored voter entirely.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is not stored.
    pub async fn update_voter(&self, voter: VoterRecord) -> Result<(), StoreError> {
        warn_on_foreign_history(&voter);
        let voter_id = voter.voter_id;
        let result = self.backend.update(voter).await;
        if result.is_ok() {
            debug!(%voter_id, backend = self.backend.name(), "Voter updated");
        }
        self.observe(result)
    }

    /// Remove a stored voter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if nothing was deleted.
    pub async fn delete_voter(&self, voter_id: VoterId) -> Result<(), StoreError> {
        let result = self.backend.delete(voter_id).await;
        if result.is_ok() {
            debug!(%voter_id, backend = self.backend.name(), "Voter deleted");
        }
        self.observe(result)
    }

    /// Remove every voter, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartialDelete`] if the backend removed fewer
    /// records than it targeted.
    pub async fn delete_all(&self) -> Result<usize, StoreError> {
        let result = self.backend.delete_all().await;
        if let Ok(removed) = result {
            info!(removed, backend = self.backend.name(), "All voters deleted");
        }
        self.observe(result)
    }

    /// Copies of every stored voter, in backend-dependent order.
    ///
    /// # Errors
    ///
    /// Returns a transport or serialization error from the remote backend.
    pub async fn get_all_voters(&self) -> Result<Vec<VoterRecord>, StoreError> {
        self.observe(self.backend.list_all().await)
    }

    /// Every stored voter whose `is_done` equals the argument.
    ///
    /// # Errors
    ///
    /// Returns a transport or serialization error from the remote backend.
    pub async fn get_voters_by_done_status(
        &self,
        is_done: bool,
    ) -> Result<Vec<VoterRecord>, StoreError> {
        let voters = self.observe(self.backend.list_all().await)?;
        Ok(voters.into_iter().filter(|v| v.is_done == is_done).collect())
    }

    /// The voter's poll history, in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the voter is not stored.
    pub async fn get_all_voter_polls(&self, voter_id: VoterId) -> Result<Vec<PollEntry>, StoreError> {
        let voter = self.observe(self.backend.get(voter_id).await)?;
        Ok(voter.history)
    }

    /// The voter's entry for `poll_id`; the last one wins on duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the voter is not stored, or
    /// [`StoreError::PollNotFound`] if the voter has no entry for the poll.
    pub async fn get_voter_poll(
        &self,
        voter_id: VoterId,
        poll_id: PollId,
    ) -> Result<PollEntry, StoreError> {
        let result = self.backend.get(voter_id).await.and_then(|voter| {
            voter
                .poll_entry(poll_id)
                .cloned()
                .ok_or(StoreError::PollNotFound { voter_id, poll_id })
        });
        self.observe(result)
    }

    /// Set `is_done` on a stored voter, leaving every other field alone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the voter is not stored.
    pub async fn change_done_status(&self, voter_id: VoterId, is_done: bool) -> Result<(), StoreError> {
        let result = self.backend.set_done(voter_id, is_done).await;
        if result.is_ok() {
            debug!(%voter_id, is_done, "Voter done status changed");
        }
        self.observe(result)
    }
}

impl Default for VoterStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// History entries should belong to their record; they are stored anyway.
fn warn_on_foreign_history(voter: &VoterRecord) {
    let foreign = voter.foreign_history_entries().count();
    if foreign > 0 {
        warn!(
            voter_id = %voter.voter_id,
            foreign,
            "Voter history contains entries for another voter"
        );
    }
}
