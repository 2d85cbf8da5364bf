use std::path::PathBuf;

use fantoccini::error::{CmdError, NewSessionError};
use thiserror::Error;

/// A page failed to load and render after exhausting all attempts.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to open a browser session at {webdriver_url}: {source}")]
    Session {
        webdriver_url: String,
        #[source]
        source: NewSessionError,
    },

    #[error("timed out loading {url} after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("navigation failed for {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: CmdError,
    },
}

/// An image failed to fetch. Caught per container; the image is omitted.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("server returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("transfer failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A page-level failure. Caught by the orchestrator; the page is skipped.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The accumulated dataset could not be serialized or written.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write dataset file: {0}")]
    Io(#[from] std::io::Error),
}
