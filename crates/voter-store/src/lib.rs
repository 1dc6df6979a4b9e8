//! Data layer for the voter record service.
//!
//! Voter records are kept in one of two interchangeable backends: a
//! process-local map, or `Dragonfly` (Redis-compatible) with each record
//! stored as a JSON document under `voter:{id}`. The backend is chosen from
//! configuration when the store is built; the public contract of
//! [`VoterStore`] is identical for both.
//!
//! # Architecture
//!
//! ```text
//! HTTP layer / voter-dump
//!     |
//!     +-- VoterStore (lifecycle + poll queries, metrics)
//!         |
//!         +-- VoterBackend::Memory ----> BTreeMap behind RwLock
//!         +-- VoterBackend::Dragonfly -> voter:{id} JSON documents
//! ```
//!
//! # Modules
//!
//! - [`store`] -- [`VoterStore`], the record lifecycle authority
//! - [`backend`] -- Enum dispatch over the two backends
//! - [`memory`] -- In-process map backend
//! - [`dragonfly`] -- `Dragonfly` document backend
//! - [`config`] -- YAML + environment configuration
//! - [`metrics`] -- Injected operation counters
//! - [`pretty`] -- Indented JSON dumps of records
//! - [`error`] -- Shared error types

pub mod backend;
pub mod config;
pub mod dragonfly;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod pretty;
pub mod store;

// Re-export primary types for convenience.
pub use backend::VoterBackend;
pub use config::{BackendKind, StoreConfig};
pub use dragonfly::DragonflyBackend;
pub use error::StoreError;
pub use memory::MemoryBackend;
pub use metrics::{MetricsSnapshot, StoreMetrics};
pub use store::VoterStore;
