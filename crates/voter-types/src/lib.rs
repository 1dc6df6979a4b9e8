//! Shared type definitions for the voter record service.
//!
//! This crate is the single source of truth for the records the store
//! persists and the HTTP layer serves.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe `u64` wrappers for voter and poll identifiers
//! - [`structs`] -- Voter records and poll history entries

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{PollId, VoterId};
pub use structs::{PollEntry, VoterRecord};
