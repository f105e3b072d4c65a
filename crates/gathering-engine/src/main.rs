//! Loader binary for gathering nodes.
//!
//! Reads a JSON data dump, assembles every node, and prints one JSON
//! summary per selected node on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `gathering-config.yaml` (or the path given
//!    as the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Read and parse the data dump
//! 4. Build the node registry
//! 5. Select nodes by item and uptime filters
//! 6. Write the summaries

mod config;
mod error;
mod output;

use std::path::{Path, PathBuf};

use gathering_nodes::{EorzeaTime, NodeRegistry};
use gathering_types::GatheringData;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::GathererConfig;
use crate::error::EngineError;

/// Configuration file read when no path is given.
const DEFAULT_CONFIG_PATH: &str = "gathering-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration or the data dump cannot be
/// loaded, the nodes cannot be assembled, or the output cannot be written.
fn main() -> Result<(), EngineError> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("gathering-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }

    let path = &config.data.path;
    let json = std::fs::read_to_string(path).map_err(|source| EngineError::ReadData {
        path: path.clone(),
        source,
    })?;
    let data = GatheringData::from_json(&json)?;
    info!(
        path = %path.display(),
        points = data.points.len(),
        sightings = data.sightings.len(),
        "Data dump parsed"
    );

    let registry = NodeRegistry::build(&data)?;

    let time = config.display.hour.map_or_else(
        EorzeaTime::now,
        |hour| EorzeaTime::from_hour_minute(hour, 0),
    );
    let nodes = output::select(&registry, &config.display, time);
    info!(
        %time,
        selected = nodes.len(),
        total = registry.len(),
        "Nodes selected"
    );

    let mut stdout = std::io::stdout().lock();
    let written = output::write_summaries(&mut stdout, &nodes, &config.display, time)?;
    info!(written, "gathering-engine finished");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults if it does
/// not exist. Returns whether the file was read.
fn load_config(path: &Path) -> Result<(GathererConfig, bool), EngineError> {
    if path.exists() {
        Ok((GathererConfig::from_file(path)?, true))
    } else {
        let mut config = GathererConfig::default();
        config.data.apply_env_overrides();
        Ok((config, false))
    }
}
