//! Error types for the voter store.
//!
//! All failures are propagated via [`StoreError`]. Domain failures carry the
//! offending identifiers; transport failures wrap the underlying [`fred`]
//! error so the caller can tell a missing voter from an unreachable backend.

use std::time::Duration;

use voter_types::{PollId, VoterId};

/// Errors that can occur in the voter store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A voter with this id is already stored.
    #[error("voter {0} already exists")]
    AlreadyExists(VoterId),

    /// No voter with this id is stored.
    #[error("voter {0} not found")]
    NotFound(VoterId),

    /// The voter exists but has no history entry for the poll.
    #[error("voter {voter_id} has no entry for poll {poll_id}")]
    PollNotFound {
        /// The voter that was searched.
        voter_id: VoterId,
        /// The poll that was not found.
        poll_id: PollId,
    },

    /// A bulk delete removed fewer keys than it targeted.
    #[error("bulk delete removed {deleted} of {requested} keys")]
    PartialDelete {
        /// Number of keys the delete targeted.
        requested: usize,
        /// Number of keys actually removed.
        deleted: usize,
    },

    /// A `Dragonfly`/Redis command failed or the backend is unreachable.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(#[from] fred::error::Error),

    /// A `Dragonfly`/Redis command did not complete in time.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// The command that timed out.
        operation: &'static str,
        /// The bound that was exceeded.
        after: Duration,
    },

    /// A record could not be serialized or a stored document could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether this error means the voter or poll is absent.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::PollNotFound { .. })
    }

    /// Whether this error came from the backend transport.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::TransportUnavailable(_) | Self::Timeout { .. })
    }
}
