use thiserror::Error;

/// Failures talking to the chat endpoints. Both kinds are logged and dropped.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be built, sent, or its body read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not valid JSON for the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
