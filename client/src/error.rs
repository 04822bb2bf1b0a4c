use shared::{ProtocolError, ResourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("round timer failed: {0}")]
    Timer(#[from] tokio::task::JoinError),
}
