use clap::Parser;
use std::time::Duration;

use crate::live_scores::poller::DEFAULT_POLL_INTERVAL;
use crate::models::DateKey;

/// Live NBA score ticker
#[derive(Parser, Debug, Clone)]
#[command(name = "courtside-ticker", version, about)]
pub struct Config {
    /// Base URL of the blog backend serving /api/live-scores
    #[arg(long, env = "SCORES_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Date to follow: "today" or YYYY-MM-DD
    #[arg(long, env = "SCORES_DATE", default_value = "today")]
    pub date: DateKey,

    /// Score polling interval in seconds
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    pub poll_interval_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "127.0.0.1:8080")]
    pub dashboard_addr: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        if let Err(e) = url::Url::parse(&self.api_url) {
            anyhow::bail!("SCORES_API_URL is not a valid URL ({}): {}", e, self.api_url);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
