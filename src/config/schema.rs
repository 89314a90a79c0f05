//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the signer
//! client. All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Root configuration for the remote signer client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SignerConfig {
    /// Remote signer JSON-RPC endpoint (e.g., "https://signer.internal:8080").
    pub endpoint: String,

    /// Address forwarded as `from` in signing requests.
    ///
    /// Left unset, the remote signer picks the key on its own.
    pub address: Option<Address>,

    /// Mutual TLS material.
    pub tls: TlsConfig,

    /// HTTP transport tuning.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl SignerConfig {
    /// Create a configuration for `endpoint` with the given TLS material and
    /// defaults everywhere else.
    pub fn new(endpoint: impl Into<String>, tls: TlsConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            tls,
            ..Default::default()
        }
    }
}

/// Paths to the CA bundle and the client certificate/key pair (PEM).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TlsConfig {
    /// CA bundle used to verify the remote signer.
    pub ca_cert: PathBuf,

    /// Client certificate chain presented to the remote signer.
    pub cert: PathBuf,

    /// Private key matching `cert`.
    pub key: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            ca_cert: PathBuf::from("tls/ca.crt"),
            cert: PathBuf::from("tls/tls.crt"),
            key: PathBuf::from("tls/tls.key"),
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// TCP + TLS connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Idle connections kept per host. Zero forces a fresh handshake per call.
    pub pool_max_idle_per_host: usize,

    /// How long an idle pooled connection is kept, in seconds.
    pub pool_idle_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            pool_max_idle_per_host: 32,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
