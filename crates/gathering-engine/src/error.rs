//! Error types for the loader binary.
//!
//! [`EngineError`] wraps every failure mode of a run so `main` can
//! propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the loader binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Reading the data dump failed.
    #[error("failed to read data dump {path}: {source}")]
    ReadData {
        /// Path of the dump.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Parsing the dump or encoding a summary failed.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Node assembly failed.
    #[error("node error: {source}")]
    Node {
        /// The underlying node error.
        #[from]
        source: gathering_nodes::NodeError,
    },

    /// Writing the output failed.
    #[error("failed to write output: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
