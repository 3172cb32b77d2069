//! Error types for the video report.

use thiserror::Error;

/// Everything that can go wrong while producing a report.
///
/// The variants map onto how the run reacts to them:
/// [`Error::Auth`] aborts the run before any data is fetched, [`Error::Transport`] and
/// [`Error::HttpStatus`] are logged by the fetchers and treated as "no data", and
/// [`Error::MalformedResponse`] on the video listing stops the run with a diagnostic.
#[derive(Debug, Error)]
pub enum Error {
    /// The client-credentials exchange did not yield an access token.
    ///
    /// Carries the provider's response body when there was one.
    #[error("failed to get access token: {0}")]
    Auth(String),

    /// The request could not be sent or its body could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body was not JSON of the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// An endpoint URL could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
