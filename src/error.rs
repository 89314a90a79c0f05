//! Error taxonomy for the signer client.

use thiserror::Error;

use crate::config::ConfigError;
use crate::rpc::{JsonRpcError, RpcError};

/// Errors returned by [`SignerClient`](crate::SignerClient).
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or unreadable TLS material or configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The construction-time health check failed.
    #[error("remote signer unreachable: {0}")]
    Connectivity(#[source] RpcError),

    /// Network, TLS or HTTP failure during a call. The caller may retry.
    #[error("transport error: {0}")]
    Transport(#[source] RpcError),

    /// The remote signer rejected or failed the request.
    #[error("remote signer error: {0}")]
    Remote(JsonRpcError),

    /// The response did not decode into a signed transaction.
    #[error("failed to decode signed transaction: {0}")]
    Decode(String),

    #[error("request canceled")]
    Canceled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A signing request that cannot be turned back into a transaction.
    #[error("unsupported signing request: {0}")]
    Unsupported(String),
}

impl Error {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::DeadlineExceeded)
    }
}

impl From<RpcError> for Error {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Remote(e) => Error::Remote(e),
            RpcError::Canceled => Error::Canceled,
            RpcError::DeadlineExceeded => Error::DeadlineExceeded,
            RpcError::Deserialize { err, text } => {
                Error::Decode(format!("unexpected result {text}: {err}"))
            }
            other => Error::Transport(other),
        }
    }
}

/// Result type for signer client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
