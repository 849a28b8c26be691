pub mod config;
pub mod history;
pub mod news;
pub mod predict;
pub mod quotes;
pub mod watch;
