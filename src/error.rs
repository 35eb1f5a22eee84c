//! Error types raised while fetching an indicator.

use thiserror::Error;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS or timeout failure before a status line arrived
    #[error("transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("<HTTPError: status={status}, body={body:?}>")]
    Http { status: u16, body: String },

    /// A field is missing or malformed in an otherwise successful response
    #[error("unexpected data shape: {0}")]
    DataShape(String),

    /// Valid response, just not enough history yet
    #[error("insufficient history: need {required} points, have {available}")]
    InsufficientHistory { required: usize, available: usize },
}

impl FetchError {
    pub fn shape(msg: impl Into<String>) -> Self {
        FetchError::DataShape(msg.into())
    }

    /// Whether this outcome should be reported as an error line.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, FetchError::InsufficientHistory { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::DataShape(format!("response body is not valid JSON: {}", e))
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::DataShape(e.to_string())
    }
}
