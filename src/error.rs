use thiserror::Error;

/// Why the catalog could not be fetched. Any of these stops the pipeline from
/// running; an empty result is never reported through this type.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status other than 401.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    /// 401 from the endpoint. The stored session token has been cleared.
    #[error("unauthorized; session cleared")]
    Unauthorized,

    /// The body was not a JSON array of catalog records.
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading or clearing the stored session token failed.
    #[error("session store: {0}")]
    Session(String),
}

impl FetchError {
    pub(crate) fn session(e: anyhow::Error) -> Self {
        FetchError::Session(format!("{:#}", e))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }
}
