use thiserror::Error;

/// Everything that can go wrong while loading a view from the upstream API.
#[derive(Debug, Error)]
pub enum DexError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("could not decode payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected payload shape: {0}")]
    Malformed(String),
}

impl DexError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Demote a 404 to a plain status failure.
    pub fn into_failure(self) -> Self {
        match self {
            Self::NotFound(url) => Self::Status { url, status: 404 },
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
