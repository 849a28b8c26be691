use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure: no response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived with a non-success status; carries the status text
    #[error("{0}")]
    Fetch(String),

    /// The payload could not be turned into the expected shape
    #[error("{0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown commodity: {0}")]
    UnknownCommodity(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_and_parse_messages_are_verbatim() {
        assert_eq!(Error::Fetch("Not Found".to_string()).to_string(), "Not Found");
        assert_eq!(Error::Parse("Invalid XML".to_string()).to_string(), "Invalid XML");
    }

    #[test]
    fn test_transport_is_distinct_from_fetch() {
        let err = Error::Transport("connection refused".to_string());
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }
}
