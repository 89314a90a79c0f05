//! Remote signing subsystem.
//!
//! # Data Flow
//! ```text
//! unsigned transaction
//!     → request.rs (project sender-independent fields, 0x-hex JSON)
//!     → client.rs (eth_signTransaction over the RPC transport)
//!     → transaction.rs (EIP-2718 decode, reject trailing bytes)
//!     → signed TxEnvelope
//! ```

pub mod client;
pub mod request;
pub mod transaction;

pub use client::{SignerClient, HEALTH_CHECK_TIMEOUT};
pub use request::SigningRequest;
pub use transaction::decode_signed_transaction;
