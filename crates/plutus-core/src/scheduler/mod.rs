mod service;

pub use service::{DashboardEvent, DashboardPoller, QuoteBoard};
