use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod dashboard;
mod dates;
mod live_scores;
mod models;

use config::Config;
use dashboard::AppState;
use live_scores::{HttpScoreProvider, ScorePoller, ScoreProvider, TickerView};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let provider: Arc<dyn ScoreProvider> = Arc::new(HttpScoreProvider::new(
        &config.api_url,
        config.request_timeout(),
    )?);
    info!("Score source: {} ({})", provider.name(), config.api_url);

    let poller = ScorePoller::spawn(provider, config.poll_interval());
    poller.start(config.date);

    // Log the ticker line whenever a new snapshot lands
    {
        let mut rx = poller.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let view = TickerView::from_view(&rx.borrow_and_update());
                let line: Vec<&str> = view.chips.iter().map(|c| c.label.as_str()).collect();
                info!(
                    "Ticker ({} games, {}ms cycle): {}",
                    line.len(),
                    view.scroll_duration_ms,
                    if line.is_empty() {
                        view.message.unwrap_or_default().to_string()
                    } else {
                        line.join(" | ")
                    }
                );
            }
        });
    }

    // Start the dashboard HTTP server
    let app = dashboard::router(AppState {
        poller: poller.clone(),
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await?;

    poller.stop();
    Ok(())
}
