//! JSON-RPC 2.0 envelope types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A JSON-RPC 2.0 error object as returned by the remote signer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Error)]
#[error("{message} (code: {code})")]
pub struct JsonRpcError {
    /// The error code
    pub code: i64,
    /// The error message, passed through verbatim
    pub message: String,
    /// Additional data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC request.
#[derive(Serialize, Debug)]
pub struct Request<'a, T> {
    id: u64,
    jsonrpc: &'a str,
    method: &'a str,
    params: T,
}

impl<'a, T> Request<'a, T> {
    pub fn new(id: u64, method: &'a str, params: T) -> Self {
        Self {
            id,
            jsonrpc: "2.0",
            method,
            params,
        }
    }
}

/// A JSON-RPC response; the result stays untyped until the caller decodes it.
#[derive(Deserialize, Debug, Clone)]
pub struct Response {
    #[serde(default)]
    pub id: Value,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ResponsePayload {
    Error { error: JsonRpcError },
    Success { result: Value },
}

impl ResponsePayload {
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self {
            ResponsePayload::Success { result } => Ok(result),
            ResponsePayload::Error { error } => Err(error),
        }
    }
}
