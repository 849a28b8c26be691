mod fetcher;
mod models;
mod parser;
mod tree;

pub use fetcher::FeedParser;
pub use models::{sort_newest_first, ArticleRecord};
pub use parser::{parse_feed, project_items};
pub use tree::{parse_document, XmlNode};
