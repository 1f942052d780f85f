use reqwest::StatusCode;
use thiserror::Error;

/// Failure taxonomy shared by the credential layer and the API client.
///
/// Every error carries enough context for the caller to decide on a retry
/// policy; no variant is retried internally. `Api` distinguishes client
/// errors (4xx, not retryable) from server errors (5xx/429, retryable by
/// caller policy) through its status code.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// The provider rejected or errored during the interactive flow.
    /// Fatal; requires the operator to retry authorization.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// A refresh was required but no refresh token is stored.
    /// Fatal; requires re-authorization via `splcli auth`.
    #[error("no refresh token stored; run `splcli auth` to re-authorize")]
    Credential,

    /// Network-level failure talking to the provider.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any non-2xx provider response during a resource call. Carries the
    /// raw error body for diagnosis.
    #[error("spotify api error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    /// Playlist identifier resolution found no match.
    #[error("no matching playlist found for '{0}'")]
    NotFound(String),

    /// A chunked batch write stopped at the first failing chunk. Chunks
    /// `0..committed` were accepted by the provider and are not rolled
    /// back; chunks after the failing one were never attempted.
    #[error("batch write stopped after {committed} of {total} chunks: {source}")]
    Batch {
        committed: usize,
        total: usize,
        source: Box<SpotifyError>,
    },

    /// The durable credential store could not be read or written.
    #[error("credential store error: {0}")]
    Store(String),
}

impl SpotifyError {
    /// Builds an `Api` error from a non-2xx response, consuming the body.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        SpotifyError::Api { status, body }
    }
}
