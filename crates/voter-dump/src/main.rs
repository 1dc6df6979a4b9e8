//! Diagnostic dump of the voter store.
//!
//! Builds the configured store, optionally seeds it, and prints every
//! voter as indented JSON on standard output. Logs go to standard error.
//!
//! # Environment
//!
//! - `VOTER_CONFIG` -- path to a YAML [`StoreConfig`] (defaults otherwise)
//! - `VOTER_BACKEND`, `REDIS_URL`, `VOTER_COMMAND_TIMEOUT_MS` -- store overrides
//! - `VOTER_SEED_FILE` -- JSON array of voters to add before dumping
//! - `VOTER_DUMP_FILTER` -- `all` (default), `done`, or `pending`
//! - `RUST_LOG` -- log filter (falls back to the configured `log_level`)

mod error;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voter_store::pretty::print_voters;
use voter_store::{StoreConfig, StoreError, StoreMetrics, VoterStore};
use voter_types::VoterRecord;

use crate::error::DumpError;

/// Which voters to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum DumpFilter {
    /// Every stored voter.
    #[default]
    All,
    /// Only voters marked done.
    Done,
    /// Only voters not yet done.
    Pending,
}

impl DumpFilter {
    /// The `is_done` value to filter on, if any.
    const fn done_status(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Done => Some(true),
            Self::Pending => Some(false),
        }
    }
}

impl FromStr for DumpFilter {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "done" => Ok(Self::Done),
            "pending" | "not-done" => Ok(Self::Pending),
            other => Err(DumpError::Filter(other.to_owned())),
        }
    }
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, seeding, or the dump fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        backend = %config.backend,
        dragonfly_url = config.dragonfly_url,
        "voter-dump starting"
    );

    run(&config).await?;
    Ok(())
}

/// Load the store configuration from `VOTER_CONFIG` or the environment.
fn load_config() -> Result<StoreConfig, StoreError> {
    match std::env::var("VOTER_CONFIG") {
        Ok(path) => StoreConfig::from_file(Path::new(&path)),
        Err(_) => StoreConfig::from_env(),
    }
}

/// Connect, seed, and print.
async fn run(config: &StoreConfig) -> Result<(), DumpError> {
    let filter: DumpFilter = std::env::var("VOTER_DUMP_FILTER")
        .unwrap_or_default()
        .parse()?;

    let metrics = Arc::new(StoreMetrics::new());
    let store = VoterStore::connect(config)
        .await?
        .with_metrics(Arc::clone(&metrics));

    if let Ok(path) = std::env::var("VOTER_SEED_FILE") {
        let seeded = seed_from_file(&store, &path).await?;
        info!(seeded, path, "Seed file loaded");
    }

    let voters = match filter.done_status() {
        None => store.get_all_voters().await?,
        Some(is_done) => store.get_voters_by_done_status(is_done).await?,
    };
    print_voters(&voters)?;

    let snapshot = metrics.snapshot();
    info!(
        printed = voters.len(),
        operations = snapshot.operations,
        failures = snapshot.failures,
        "Dump complete"
    );
    Ok(())
}

/// Add every voter in the JSON array at `path`, skipping ids already stored.
async fn seed_from_file(store: &VoterStore, path: &str) -> Result<usize, DumpError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DumpError::SeedIo {
        path: path.to_owned(),
        source,
    })?;
    let voters = parse_seed(&contents).map_err(|source| DumpError::SeedFormat {
        path: path.to_owned(),
        source,
    })?;

    let mut added: usize = 0;
    for voter in voters {
        let voter_id = voter.voter_id;
        match store.add_voter(voter).await {
            Ok(()) => added = added.saturating_add(1),
            Err(StoreError::AlreadyExists(_)) => {
                warn!(%voter_id, "Seed voter already stored, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(added)
}

/// Parse a seed document: a JSON array of voter records.
fn parse_seed(contents: &str) -> Result<Vec<VoterRecord>, serde_json::Error> {
    serde_json::from_str(contents)
}
