//! Error types for the CLI.

use faithfocus_client::ApiClientError;
use faithfocus_core::{ConfigError, UpstreamError};
use faithfocus_storage::LmdbStoreError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ApiClientError),
    #[error("Failed to open chapter cache: {0}")]
    Store(#[from] LmdbStoreError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
