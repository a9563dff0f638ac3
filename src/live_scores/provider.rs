use async_trait::async_trait;

use super::error::FetchError;
use crate::models::{DateKey, ScoreSnapshot};

/// Trait that every score source must implement.
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    /// Return the full snapshot of games for `date`.
    async fn fetch_snapshot(&self, date: DateKey) -> Result<ScoreSnapshot, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
