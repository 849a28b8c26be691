use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use plutus_core::{
    feed::FeedParser,
    market::QuoteClient,
    scheduler::{DashboardEvent, DashboardPoller},
    AppConfig,
};

use super::quotes::format_quote;

/// Run the dashboard poller until Ctrl+C
pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let client = QuoteClient::from_config(&config)?;

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Setup signal handler for graceful shutdown
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut poller = DashboardPoller::new(client, &config).with_event_sender(event_tx);
    match FeedParser::from_config(&config) {
        Ok(parser) => poller = poller.with_news(Arc::new(parser)),
        Err(e) => warn!("News disabled: {}", e),
    }

    println!(
        "Watching {} commodities (every {}s). Press Ctrl+C to stop.\n",
        config.market.commodities.len(),
        config.market.poll_interval_secs
    );

    let handle = tokio::spawn(poller.run(shutdown_rx));

    // The channel closes once the poller has stopped and dropped its sender
    while let Some(event) = event_rx.recv().await {
        let now = Local::now().format("%H:%M:%S");
        match event {
            DashboardEvent::QuoteUpdated { commodity, quote } => {
                println!("[{}] {}", now, format_quote(commodity.name(), commodity.ticker(), &quote));
            }
            DashboardEvent::NewsLoaded { articles } => {
                println!("[{}] {} news articles:", now, articles.len());
                for article in articles.iter().take(5) {
                    println!("           - {} ({})", article.headline(), article.source_name);
                }
            }
            DashboardEvent::Error { task, message } => {
                println!("[{}] {} failed: {}", now, task, message);
            }
        }
    }

    handle.await?;
    println!("Stopped.");

    Ok(())
}
