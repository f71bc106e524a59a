use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong in one trigger of a lookup widget.
///
/// The dashboard shows the same failure message for all of these; the
/// variants only matter for logging and for callers that want to branch.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("empty input")]
    EmptyInput,

    #[error("request failed with HTTP {status}")]
    RequestFailed { status: StatusCode },

    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("transport failure: {0}")]
    TransportFailure(#[from] reqwest::Error),
}

impl LookupError {
    /// True when the error was raised before any network access.
    pub fn is_validation(&self) -> bool {
        matches!(self, LookupError::EmptyInput)
    }
}
