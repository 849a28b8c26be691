mod client;
mod models;

pub use client::QuoteClient;
pub use models::{change_percent, Commodity, CommodityQuote, HistoricalPoint, HistoricalSeries, Trend};
