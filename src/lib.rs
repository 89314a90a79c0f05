//! Client for remote transaction signers reached over mutual TLS.

pub mod config;
pub mod error;
pub mod observability;
pub mod rpc;
pub mod signer;
pub mod tls;

pub use config::SignerConfig;
pub use error::{Error, Result};
pub use rpc::CallContext;
pub use signer::{SignerClient, SigningRequest};
