pub type HelixResult<T> = core::result::Result<T, HelixError>;

#[derive(Debug, thiserror::Error)]
pub enum HelixError {
    #[error("helix request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("helix responded with {status}: {}", message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },

    #[error("failed to acquire an app access token: {0}")]
    Token(String),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl HelixError {
    /// HTTP status of the failed response, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            HelixError::Status { status, .. } => Some(*status),
            HelixError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
