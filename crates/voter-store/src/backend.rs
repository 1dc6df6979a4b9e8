//! Backend selection for the voter store.
//!
//! Uses enum dispatch instead of trait objects because async methods are
//! not dyn-compatible. The variant is chosen once, from [`StoreConfig`],
//! when the store is built.

use voter_types::{VoterId, VoterRecord};

use crate::config::{BackendKind, StoreConfig};
use crate::dragonfly::DragonflyBackend;
use crate::error::StoreError;
use crate::memory::MemoryBackend;

/// Physical storage behind a [`VoterStore`](crate::VoterStore).
#[derive(Clone)]
pub enum VoterBackend {
    /// Process-local map.
    Memory(MemoryBackend),
    /// `Dragonfly` document cache.
    Dragonfly(DragonflyBackend),
}

impl VoterBackend {
    /// Build the backend named by `config`.
    ///
    /// The `Dragonfly` variant connects and pings before returning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the remote backend is unreachable or its
    /// URL is invalid.
    pub async fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.backend {
            BackendKind::Memory => Ok(Self::Memory(MemoryBackend::new())),
            BackendKind::Dragonfly => {
                let backend =
                    DragonflyBackend::connect(&config.redis_url(), config.command_timeout())
                        .await?;
                Ok(Self::Dragonfly(backend))
            }
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Dragonfly(_) => "dragonfly",
        }
    }

    pub(crate) async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Dragonfly(backend) => backend.ping().await,
        }
    }

    pub(crate) async fn add(&self, voter: VoterRecord) -> Result<(), StoreError> {
        match self {
            Self::Memory(backend) => backend.add(voter).await,
            Self::Dragonfly(backend) => backend.add(&voter).await,
        }
    }

    pub(crate) async fn get(&self, voter_id: VoterId) -> Result<VoterRecord, StoreError> {
        match self {
            Self::Memory(backend) => backend.get(voter_id).await,
            Self::Dragonfly(backend) => backend.get(voter_id).await,
        }
    }

    pub(crate) async fn update(&self, voter: VoterRecord) -> Result<(), StoreError> {
        match self {
            Self::Memory(backend) => backend.update(voter).await,
            Self::Dragonfly(backend) => backend.update(&voter).await,
        }
    }

    pub(crate) async fn delete(&self, voter_id: VoterId) -> Result<(), StoreError> {
        match self {
            Self::Memory(backend) => backend.delete(voter_id).await,
            Self::Dragonfly(backend) => backend.delete(voter_id).await,
        }
    }

    pub(crate) async fn delete_all(&self) -> Result<usize, StoreError> {
        match self {
            Self::Memory(backend) => Ok(backend.delete_all().await),
            Self::Dragonfly(backend) => backend.delete_all().await,
        }
    }

    pub(crate) async fn list_all(&self) -> Result<Vec<VoterRecord>, StoreError> {
        match self {
            Self::Memory(backend) => Ok(backend.list_all().await),
            Self::Dragonfly(backend) => backend.list_all().await,
        }
    }

    pub(crate) async fn set_done(&self, voter_id: VoterId, is_done: bool) -> Result<(), StoreError> {
        match self {
            Self::Memory(backend) => backend.set_done(voter_id, is_done).await,
            Self::Dragonfly(backend) => backend.set_done(voter_id, is_done).await,
        }
    }
}

impl From<MemoryBackend> for VoterBackend {
    fn from(backend: MemoryBackend) -> Self {
        Self::Memory(backend)
    }
}

impl From<DragonflyBackend> for VoterBackend {
    fn from(backend: DragonflyBackend) -> Self {
        Self::Dragonfly(backend)
    }
}
