use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Faults raised by the Trello API adapter.
///
/// Every remote call either returns the decoded payload or one of these;
/// nothing is retried and nothing is cached.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} failed with status {status}: {message}")]
    Api { operation: &'static str, status: u16, message: String },

    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
