mod client;
mod models;

pub use client::InsightClient;
pub use models::{Predictions, PricePrediction, Sentiment, SentimentLabel};
