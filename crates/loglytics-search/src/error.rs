use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search engine request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search engine returned {status}: {body}")]
    Engine { status: u16, body: String },

    #[error("search engine response was not the expected shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// Preview keeps the underlying engine message; callers surface it.
    #[error("Preview calculation failed: {0}")]
    PreviewFailed(String),

    #[error("no write index behind alias {0}")]
    MappingNotFound(String),

    #[error("invalid_cursor")]
    InvalidCursor,
}
