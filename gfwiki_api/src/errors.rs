//! Error types for the wiki client.

use std::path::PathBuf;

/// Errors that can occur when talking to the wiki.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The wiki answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },
    /// A page path or image source could not be turned into a URL.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Writing a downloaded file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
