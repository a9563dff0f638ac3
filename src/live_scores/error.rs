use reqwest::StatusCode;
use thiserror::Error;

/// Why a score fetch produced no snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Superseded by a newer fetch or aborted by `stop()`
    #[error("fetch cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("malformed score snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Cancellations are expected control flow, never reported.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FetchError::Cancelled.to_string(), "fetch cancelled");
        assert_eq!(
            FetchError::Status(StatusCode::BAD_GATEWAY).to_string(),
            "HTTP 502 Bad Gateway"
        );
        assert!(FetchError::Cancelled.is_cancelled());
        assert!(!FetchError::Status(StatusCode::NOT_FOUND).is_cancelled());
    }
}
