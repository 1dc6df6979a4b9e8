//! `Dragonfly` (Redis-compatible) voter storage.
//!
//! Each voter is one JSON document stored as a plain string value.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `voter:{id}` | JSON | Full voter record, `voterHistory` omitted when empty |
//!
//! The raw `SET` is an unconditional overwrite, so adds use `SET NX` and
//! updates use `SET XX`: the existence check and the write are one atomic
//! command per key. Listing and bulk delete enumerate `voter:*` and are not
//! atomic across keys; a write racing a bulk delete may or may not survive.

use std::future::Future;
use std::time::Duration;

use fred::prelude::*;
use fred::types::SetOptions;
use tracing::{debug, info, warn};
use voter_types::{VoterId, VoterRecord};

use crate::error::StoreError;

/// Namespace prepended to every voter id to form its key.
pub const KEY_PREFIX: &str = "voter:";

/// Build the storage key for `voter_id`.
pub fn voter_key(voter_id: VoterId) -> String {
    format!("{KEY_PREFIX}{voter_id}")
}

/// Connection handle to a `Dragonfly` (Redis-compatible) instance.
///
/// Wraps a [`fred::prelude::Client`]. Every command is bounded by the
/// configured timeout and surfaces [`StoreError::Timeout`] instead of
/// hanging.
#[derive(Clone)]
pub struct DragonflyBackend {
    client: Client,
    command_timeout: Duration,
}

impl DragonflyBackend {
    /// Connect to `Dragonfly` at the given URL and verify it answers `PING`.
    ///
    /// The URL should follow the Redis URL scheme: `redis://host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed.
    /// Returns [`StoreError::TransportUnavailable`] or [`StoreError::Timeout`]
    /// if the connection or the ping fails.
    pub async fn connect(url: &str, command_timeout: Duration) -> Result<Self, StoreError> {
        let config = Config::from_url(url)
            .map_err(|e| StoreError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        let backend = Self {
            client,
            command_timeout,
        };

        let _connection = backend.bounded("CONNECT", backend.client.init()).await?;
        backend.ping().await?;

        info!(url, "Connected to Dragonfly");
        Ok(backend)
    }

    /// Check that the instance is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransportUnavailable`] or [`StoreError::Timeout`].
    pub async fn ping(&self) -> Result<(), StoreError> {
        let _: () = self.bounded("PING", self.client.ping(None)).await?;
        Ok(())
    }

    /// Run `command`, failing with [`StoreError::Timeout`] past the bound.
    async fn bounded<T, F>(&self, operation: &'static str, command: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, fred::error::Error>>,
    {
        match tokio::time::timeout(self.command_timeout, command).await {
            Ok(result) => Ok(result?),
            Err(_elapsed) => Err(StoreError::Timeout {
                operation,
                after: self.command_timeout,
            }),
        }
    }

    // =========================================================================
    // Single-voter operations -- voter:{id}
    // =========================================================================

    /// Store `voter` unless its key already exists (`SET NX`).
    pub(crate) async fn add(&self, voter: &VoterRecord) -> Result<(), StoreError> {
        let key = voter_key(voter.voter_id);
        let json = serde_json::to_string(voter)?;
        let written: Option<String> = self
            .bounded(
                "SET NX",
                self.client
                    .set(&key, json.as_str(), None, Some(SetOptions::NX), false),
            )
            .await?;
        if written.is_none() {
            return Err(StoreError::AlreadyExists(voter.voter_id));
        }
        debug!(key, "Voter document created");
        Ok(())
    }

    /// Read and parse the document for `voter_id`.
    pub(crate) async fn get(&self, voter_id: VoterId) -> Result<VoterRecord, StoreError> {
        let key = voter_key(voter_id);
        let value: Option<String> = self.bounded("GET", self.client.get(&key)).await?;
        value.map_or_else(
            || Err(StoreError::NotFound(voter_id)),
            |s| Ok(serde_json::from_str(&s)?),
        )
    }

    /// Overwrite the document for `voter` only if it exists (`SET XX`).
    pub(crate) async fn update(&self, voter: &VoterRecord) -> Result<(), StoreError> {
        let key = voter_key(voter.voter_id);
        let json = serde_json::to_string(voter)?;
        let written: Option<String> = self
            .bounded(
                "SET XX",
                self.client
                    .set(&key, json.as_str(), None, Some(SetOptions::XX), false),
            )
            .await?;
        if written.is_none() {
            return Err(StoreError::NotFound(voter.voter_id));
        }
        debug!(key, "Voter document replaced");
        Ok(())
    }

    /// Delete the document for `voter_id`. Deleting nothing is an error.
    pub(crate) async fn delete(&self, voter_id: VoterId) -> Result<(), StoreError> {
        let key = voter_key(voter_id);
        let deleted: u64 = self.bounded("DEL", self.client.del(&key)).await?;
        if deleted == 0 {
            return Err(StoreError::NotFound(voter_id));
        }
        Ok(())
    }

    /// Read-modify-write of `isDone` on an existing document.
    pub(crate) async fn set_done(&self, voter_id: VoterId, is_done: bool) -> Result<(), StoreError> {
        let mut voter = self.get(voter_id).await?;
        voter.is_done = is_done;
        self.update(&voter).await
    }

    // =========================================================================
    // Namespace-wide operations -- voter:*
    // =========================================================================

    /// Every key currently under the voter namespace.
    pub(crate) async fn voter_keys(&self) -> Result<Vec<String>, StoreError> {
        let pattern = format!("{KEY_PREFIX}*");
        self.bounded("KEYS", self.client.custom(fred::cmd!("KEYS"), vec![pattern]))
            .await
    }

    /// Fetch and parse every voter document in one `MGET`.
    ///
    /// Keys deleted between the `KEYS` and the `MGET` are skipped.
    pub(crate) async fn list_all(&self) -> Result<Vec<VoterRecord>, StoreError> {
        let keys = self.voter_keys().await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let requested = keys.len();
        let values: Vec<Option<String>> = self.bounded("MGET", self.client.mget(keys)).await?;

        let mut voters = Vec::with_capacity(values.len());
        for value in values.into_iter().flatten() {
            voters.push(serde_json::from_str(&value)?);
        }
        if voters.len() != requested {
            debug!(
                requested,
                found = voters.len(),
                "Voter keys vanished while listing"
            );
        }
        Ok(voters)
    }

    /// Delete every voter document, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartialDelete`] if `DEL` removed fewer keys
    /// than `KEYS` reported.
    pub(crate) async fn delete_all(&self) -> Result<usize, StoreError> {
        let keys = self.voter_keys().await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let requested = keys.len();
        let deleted: usize = self.bounded("DEL", self.client.del(keys)).await?;
        check_bulk_delete(requested, deleted)
    }

    /// Return a reference to the underlying [`Client`].
    pub const fn client(&self) -> &Client {
        &self.client
    }
}

/// Compare a bulk delete's result against the number of keys it targeted.
pub(crate) fn check_bulk_delete(requested: usize, deleted: usize) -> Result<usize, StoreError> {
    if deleted == requested {
        Ok(deleted)
    } else {
        warn!(requested, deleted, "Bulk delete removed a different number of keys");
        Err(StoreError::PartialDelete { requested, deleted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_the_voter_namespace() {
        assert_eq!(voter_key(VoterId::new(0)), "voter:0");
        assert_eq!(voter_key(VoterId::new(1234)), "voter:1234");
        assert!(voter_key(VoterId::new(u64::MAX)).starts_with(KEY_PREFIX));
    }

    #[test]
    fn bulk_delete_of_every_key_succeeds() {
        assert_eq!(check_bulk_delete(5, 5).ok(), Some(5));
    }

    #[test]
    fn bulk_delete_short_by_one_is_partial() {
        let result = check_bulk_delete(5, 4);
        assert!(matches!(
            result,
            Err(StoreError::PartialDelete {
                requested: 5,
                deleted: 4
            })
        ));
    }
}
