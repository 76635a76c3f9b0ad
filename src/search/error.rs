/// Why a lookup against the search service produced no usable batch.
///
/// Always recovered by the controller: logged, then handled like zero results.
#[derive(Debug, thiserror::Error)]
pub enum SearchFailure {
    /// The query was empty or the endpoint could not be turned into a URL
    #[error("invalid search request: {message}")]
    InvalidQuery { message: String },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {source}")]
    ClientBuild { source: reqwest::Error },

    /// Connection, timeout or body read failure
    #[error("search request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("search service returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The body was not the expected JSON shape
    #[error("malformed search response: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },
}

impl SearchFailure {
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// True when the defensive request timeout expired.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport { source } => source.is_timeout(),
            _ => false,
        }
    }
}
