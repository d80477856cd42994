use thiserror::Error;

/// Errors raised while submitting a paper and rendering the reply
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file selected")]
    MissingInput,

    #[error("An upload is already in flight")]
    InFlight,

    #[error("Malformed response: missing or invalid `{field}`")]
    MalformedResponse { field: String },

    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UploadError {
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedResponse {
            field: field.into(),
        }
    }

    /// True for failures that happened before or during the network exchange,
    /// i.e. the page was never cleared.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
