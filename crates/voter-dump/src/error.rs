//! Error types for the dump binary.
//!
//! [`DumpError`] wraps every failure mode so `main` can propagate with `?`.

/// Top-level error for the dump binary.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// Store construction or a store operation failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: voter_store::StoreError,
    },

    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    SeedIo {
        /// Path from `VOTER_SEED_FILE`.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The seed file is not a JSON array of voter records.
    #[error("invalid seed file {path}: {source}")]
    SeedFormat {
        /// Path from `VOTER_SEED_FILE`.
        path: String,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// `VOTER_DUMP_FILTER` has an unrecognized value.
    #[error("invalid VOTER_DUMP_FILTER: {0}")]
    Filter(String),
}
