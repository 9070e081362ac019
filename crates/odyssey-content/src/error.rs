//! Content source error types.

use thiserror::Error;

/// Errors raised while loading or decoding content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The content file could not be read.
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML content pack is not well-formed.
    #[error("invalid content pack: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The CSV export is not well-formed.
    #[error("invalid csv: {0}")]
    Csv(#[from] csv::Error),

    /// The HTTP request failed or returned an error status.
    #[error("content request failed: {0}")]
    Http(#[from] reqwest::Error),
}
