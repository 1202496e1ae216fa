use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("MLS API error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("MLS API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("MLS API returned invalid JSON: {0}")]
    Decode(String),

    #[error("MLS API configuration error: {0}")]
    Config(String),
}

impl UpstreamError {
    pub fn status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}
