pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod insight;
pub mod market;
pub mod scheduler;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use feed::{ArticleRecord, FeedParser};
