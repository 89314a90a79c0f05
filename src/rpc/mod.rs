//! JSON-RPC transport subsystem.
//!
//! # Data Flow
//! ```text
//! caller (method, params, CallContext)
//!     → context.rs (fail fast if ended, race the call against deadline/cancel)
//!     → client.rs (JSON-RPC 2.0 envelope, POST over mutual TLS)
//!     → types.rs (decode response, split result from remote error)
//!     → typed result or RpcError
//! ```

pub mod client;
pub mod context;
pub mod types;

pub use client::{RpcClient, RpcError};
pub use context::CallContext;
pub use types::JsonRpcError;
