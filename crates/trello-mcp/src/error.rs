use thiserror::Error;
use trello_client::ClientError;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Faults raised while handling one invocation.
///
/// Validation faults are raised before any remote call; remote faults wrap
/// the adapter's error. All of them are caught at the dispatcher boundary
/// and converted into an error tool result.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    MissingArgument(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
