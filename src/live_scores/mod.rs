pub mod error;
pub mod http;
pub mod poller;
pub mod provider;
pub mod ticker;

pub use http::HttpScoreProvider;
pub use poller::ScorePoller;
pub use provider::ScoreProvider;
pub use ticker::TickerView;
