//! Typed JSON-RPC calls over the secure channel.
//!
//! # Responsibilities
//! - Serialize method + params into a JSON-RPC 2.0 request
//! - POST it through the mutual-TLS `reqwest::Client`
//! - Decode the result into the caller's type or surface a structured error
//!
//! No retries happen here; retry policy belongs to the caller.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::observability::metrics;
use crate::rpc::context::CallContext;
use crate::rpc::types::{JsonRpcError, Request, Response};

/// Errors raised by [`RpcClient::call`].
#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection refused, TLS failure, connect timeout, broken stream.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status without a JSON-RPC body.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a JSON-RPC response.
    #[error("invalid JSON-RPC response: {err}. Response: {text}")]
    InvalidResponse { err: serde_json::Error, text: String },

    /// The result did not have the expected shape.
    #[error("failed to deserialize result: {err}. Result: {text}")]
    Deserialize { err: serde_json::Error, text: String },

    /// The remote side reported an error.
    #[error(transparent)]
    Remote(#[from] JsonRpcError),

    #[error("request canceled")]
    Canceled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl RpcError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::Transport(_) | RpcError::Status { .. } | RpcError::InvalidResponse { .. } => {
                "transport_error"
            }
            RpcError::Deserialize { .. } => "decode_error",
            RpcError::Remote(_) => "remote_error",
            RpcError::Canceled => "canceled",
            RpcError::DeadlineExceeded => "timeout",
        }
    }
}

/// A JSON-RPC client over a preconfigured HTTPS transport.
pub struct RpcClient {
    id: AtomicU64,
    client: reqwest::Client,
    url: Url,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RpcClient {{ id: {:?}, url: {} }}", self.id, self.url)
    }
}

impl RpcClient {
    pub fn new(url: Url, client: reqwest::Client) -> Self {
        Self {
            id: AtomicU64::new(1),
            client,
            url,
        }
    }

    /// The URL requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Call `method` with `params` and decode the result as `R`.
    ///
    /// Returns once a response arrives or `ctx` ends; an already-ended
    /// context fails before anything is sent.
    pub async fn call<P, R>(&self, ctx: &CallContext, method: &str, params: P) -> Result<R, RpcError>
    where
        P: Serialize + Send + Sync,
        R: DeserializeOwned,
    {
        ctx.check()?;

        let started = Instant::now();
        let id = self.id.fetch_add(1, Ordering::SeqCst);
        let payload = Request::new(id, method, params);

        let outcome = ctx.run(self.send(&payload)).await.and_then(|result| result);

        match &outcome {
            Ok(_) => {
                metrics::record_rpc(method, "ok", started);
                tracing::debug!(method, id, "RPC call succeeded");
            }
            Err(e) => {
                metrics::record_rpc(method, e.kind(), started);
                tracing::debug!(method, id, error = %e, "RPC call failed");
            }
        }

        outcome
    }

    async fn send<P, R>(&self, payload: &Request<'_, P>) -> Result<R, RpcError>
    where
        P: Serialize + Send + Sync,
        R: DeserializeOwned,
    {
        let res = self.client.post(self.url.clone()).json(payload).send().await?;
        let status = res.status();
        let body = res.bytes().await?;

        let response: Response = match serde_json::from_slice(&body) {
            Ok(response) => response,
            Err(_) if !status.is_success() => {
                return Err(RpcError::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).into_owned(),
                })
            }
            Err(err) => {
                return Err(RpcError::InvalidResponse {
                    err,
                    text: String::from_utf8_lossy(&body).into_owned(),
                })
            }
        };

        let result = response.payload.into_result()?;
        R::deserialize(&result).map_err(|err| RpcError::Deserialize {
            err,
            text: result.to_string(),
        })
    }
}
