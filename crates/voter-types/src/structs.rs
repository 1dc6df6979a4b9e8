//! Core entity structs: voter records and their poll history.
//!
//! Field names on the wire are camelCase to match the document layout
//! stored under `voter:{id}` keys.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{PollId, VoterId};

/// One vote cast by a voter in one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollEntry {
    /// The poll the vote was cast in.
    pub poll_id: PollId,
    /// The voter who cast it. Matches the owning [`VoterRecord::voter_id`].
    pub voter_id: VoterId,
    /// When the vote was cast.
    pub vote_date: DateTime<Utc>,
}

/// A voter and their per-poll voting history.
///
/// The record is the unit of storage: the store holds at most one record
/// per [`VoterId`] and always hands out owned copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRecord {
    /// Caller-assigned unique identifier.
    pub voter_id: VoterId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the voter is finished voting.
    pub is_done: bool,
    /// Votes in stored order. Omitted from the document when empty.
    #[serde(
        rename = "voterHistory",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub history: Vec<PollEntry>,
}

impl VoterRecord {
    /// Create a record with no history that is not yet done.
    pub fn new(voter_id: VoterId, first_name: &str, last_name: &str) -> Self {
        Self {
            voter_id,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            is_done: false,
            history: Vec::new(),
        }
    }

    /// Append a vote for `poll_id` owned by this voter.
    #[must_use]
    pub fn with_poll(mut self, poll_id: PollId, vote_date: DateTime<Utc>) -> Self {
        self.history.push(PollEntry {
            poll_id,
            voter_id: self.voter_id,
            vote_date,
        });
        self
    }

    /// Parse a record from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if the text is not a valid record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Index the history by poll id.
    ///
    /// Later entries overwrite earlier ones, so when a poll appears more
    /// than once the last-positioned entry wins.
    pub fn poll_index(&self) -> HashMap<PollId, &PollEntry> {
        self.history.iter().map(|entry| (entry.poll_id, entry)).collect()
    }

    /// Look up the authoritative entry for `poll_id`.
    pub fn poll_entry(&self, poll_id: PollId) -> Option<&PollEntry> {
        self.poll_index().get(&poll_id).copied()
    }

    /// History entries whose `voter_id` does not match this record.
    pub fn foreign_history_entries(&self) -> impl Iterator<Item = &PollEntry> {
        self.history
            .iter()
            .filter(move |entry| entry.voter_id != self.voter_id)
    }
}

/// Accept `null` for a missing history.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PollEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<PollEntry>>::deserialize(deserializer)?.unwrap_or_default())
}
