use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("generation response parse error: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("generation response contained no text")]
    EmptyResponse,

    #[error("invalid generation endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}
