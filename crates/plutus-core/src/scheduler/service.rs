use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::feed::{sort_newest_first, ArticleRecord, FeedParser};
use crate::market::{Commodity, CommodityQuote, QuoteClient};
use crate::Result;

/// Events emitted by the poller to notify the front end of changes
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A newer quote is available for a commodity
    QuoteUpdated {
        commodity: Commodity,
        quote: CommodityQuote,
    },
    /// The news feed has been loaded, newest first
    NewsLoaded { articles: Vec<ArticleRecord> },
    /// A background request failed
    Error { task: String, message: String },
}

/// Latest quote per commodity, keyed by the tick that produced it
#[derive(Debug, Default)]
pub struct QuoteBoard {
    applied: HashMap<Commodity, u64>,
    quotes: HashMap<Commodity, CommodityQuote>,
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a result from `tick` is older than what is already shown
    pub fn is_stale(&self, commodity: Commodity, tick: u64) -> bool {
        self.applied
            .get(&commodity)
            .is_some_and(|&applied| tick <= applied)
    }

    /// Store a quote unless a newer tick has already been applied.
    /// Returns whether the quote was stored.
    pub fn apply(&mut self, commodity: Commodity, tick: u64, quote: CommodityQuote) -> bool {
        if self.is_stale(commodity, tick) {
            return false;
        }
        self.applied.insert(commodity, tick);
        self.quotes.insert(commodity, quote);
        true
    }

    pub fn get(&self, commodity: Commodity) -> Option<&CommodityQuote> {
        self.quotes.get(&commodity)
    }
}

enum TaskOutput {
    Quote {
        commodity: Commodity,
        tick: u64,
        result: Result<CommodityQuote>,
    },
    News(Result<Vec<ArticleRecord>>),
}

/// Polls quotes on a fixed interval and loads the news feed once
pub struct DashboardPoller {
    quotes: QuoteClient,
    news: Option<Arc<FeedParser>>,
    commodities: Vec<Commodity>,
    poll_interval_secs: u64,
    event_tx: Option<mpsc::UnboundedSender<DashboardEvent>>,
}

impl DashboardPoller {
    /// Create a poller for the configured commodities and interval
    pub fn new(quotes: QuoteClient, config: &AppConfig) -> Self {
        Self {
            quotes,
            news: None,
            commodities: config.market.commodities.clone(),
            poll_interval_secs: config.market.poll_interval_secs,
            event_tx: None,
        }
    }

    /// Load this feed once when the poller starts
    pub fn with_news(mut self, parser: Arc<FeedParser>) -> Self {
        self.news = Some(parser);
        self
    }

    /// Set the event sender for front-end notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<DashboardEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn send_event(&self, event: DashboardEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send dashboard event: receiver dropped");
            }
        }
    }

    /// Run until the shutdown signal; in-flight requests are aborted on exit
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();
        let mut board = QuoteBoard::new();
        let mut tick: u64 = 0;

        if let Some(ref parser) = self.news {
            let parser = parser.clone();
            tasks.spawn(async move { TaskOutput::News(parser.parse().await) });
        }

        let mut interval = if self.poll_interval_secs == 0 {
            info!("Quote polling disabled (poll_interval_secs = 0)");
            None
        } else {
            info!(
                "Poller started: {} commodities every {}s",
                self.commodities.len(),
                self.poll_interval_secs
            );
            let mut interval = tokio::time::interval(Duration::from_secs(self.poll_interval_secs));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(interval)
        };

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Poller received shutdown signal");
                        break;
                    }
                }

                _ = next_tick(&mut interval) => {
                    tick += 1;
                    debug!("Polling quotes (tick {})", tick);
                    for &commodity in &self.commodities {
                        let client = self.quotes.clone();
                        tasks.spawn(async move {
                            TaskOutput::Quote {
                                commodity,
                                tick,
                                result: client.quote(commodity).await,
                            }
                        });
                    }
                }

                Some(joined) = tasks.join_next() => {
                    match joined {
                        Ok(output) => self.handle_output(&mut board, output),
                        Err(e) => error!("Poller task failed: {}", e),
                    }
                }
            }
        }

        tasks.abort_all();
        info!("Poller stopped");
    }

    fn handle_output(&self, board: &mut QuoteBoard, output: TaskOutput) {
        match output {
            TaskOutput::Quote { commodity, tick, result } => {
                if board.is_stale(commodity, tick) {
                    debug!("Dropping stale {} quote from tick {}", commodity, tick);
                    return;
                }
                match result {
                    Ok(quote) => {
                        board.apply(commodity, tick, quote.clone());
                        self.send_event(DashboardEvent::QuoteUpdated { commodity, quote });
                    }
                    Err(e) => {
                        warn!("Quote request for {} failed: {}", commodity, e);
                        self.send_event(DashboardEvent::Error {
                            task: format!("quote:{}", commodity),
                            message: e.to_string(),
                        });
                    }
                }
            }
            TaskOutput::News(Ok(mut articles)) => {
                sort_newest_first(&mut articles);
                info!("Loaded {} news articles", articles.len());
                self.send_event(DashboardEvent::NewsLoaded { articles });
            }
            TaskOutput::News(Err(e)) => {
                error!("News load failed: {}", e);
                self.send_event(DashboardEvent::Error {
                    task: "news".to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
