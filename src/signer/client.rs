//! Remote transaction signer client.
//!
//! # Responsibilities
//! - Wire the certificate watcher, secure channel and RPC transport together
//! - Health-check the remote signer once at construction and record its version
//! - Sign transactions remotely and decode the result
//!
//! # Design Decisions
//! - A failed health check yields no client; there is no half-connected state
//! - No local verification of the returned signature

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alloy::consensus::{TxEnvelope, TypedTransaction};
use alloy::primitives::{Address, Bytes};
use url::Url;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, SignerConfig, TlsConfig, ValidationError};
use crate::error::{Error, Result};
use crate::observability::logging::TracingLogger;
use crate::rpc::{CallContext, RpcClient};
use crate::signer::request::SigningRequest;
use crate::signer::transaction::decode_signed_transaction;
use crate::tls::{channel, CertWatcher};

/// Budget for the health check run during construction.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

pub const HEALTH_STATUS_METHOD: &str = "health_status";
pub const SIGN_TRANSACTION_METHOD: &str = "eth_signTransaction";

/// A connected, health-checked client for a remote signer.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct SignerClient {
    rpc: RpcClient,
    watcher: Arc<CertWatcher>,
    status: String,
    from: Option<Address>,
}

impl fmt::Debug for SignerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerClient")
            .field("endpoint", &self.rpc.url().as_str())
            .field("status", &self.status)
            .field("from", &self.from)
            .finish()
    }
}

impl SignerClient {
    /// Connect to `endpoint` using the given TLS material, with default
    /// transport settings.
    pub async fn new(endpoint: impl Into<String>, tls: TlsConfig) -> Result<Self> {
        Self::from_config(&SignerConfig::new(endpoint, tls)).await
    }

    /// Build a client from a full configuration and health-check the remote signer.
    ///
    /// Fails with [`Error::Config`] for bad configuration or TLS material and
    /// [`Error::Connectivity`] if `health_status` does not answer within
    /// [`HEALTH_CHECK_TIMEOUT`].
    pub async fn from_config(config: &SignerConfig) -> Result<Self> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let url = Url::parse(&config.endpoint).map_err(|e| {
            ConfigError::Validation(vec![ValidationError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                reason: e.to_string(),
            }])
        })?;

        let watcher = Arc::new(CertWatcher::start(
            &config.tls.cert,
            &config.tls.key,
            Arc::new(TracingLogger),
        )?);

        Self::connect(config, url, watcher).await
    }

    /// Build the channel over `watcher` and health-check the signer.
    ///
    /// On error `watcher` is dropped with everything built on it, which
    /// releases the filesystem watch.
    async fn connect(config: &SignerConfig, url: Url, watcher: Arc<CertWatcher>) -> Result<Self> {
        let http = channel::build(&config.tls, Arc::clone(&watcher), &config.transport)?;
        let rpc = RpcClient::new(url, http);

        let ctx = CallContext::new().with_timeout(HEALTH_CHECK_TIMEOUT);
        let version: String = rpc
            .call(&ctx, HEALTH_STATUS_METHOD, [(); 0])
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %rpc.url(), error = %e, "Remote signer health check failed");
                Error::Connectivity(e)
            })?;

        let status = format!("ok [version={version}]");
        tracing::info!(endpoint = %rpc.url(), %status, "Connected to remote signer");

        Ok(Self {
            rpc,
            watcher,
            status,
            from: config.address,
        })
    }

    /// Status recorded by the construction health check, `ok [version=<v>]`.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn endpoint(&self) -> &Url {
        self.rpc.url()
    }

    /// The watcher supplying the client certificate.
    pub fn watcher(&self) -> &Arc<CertWatcher> {
        &self.watcher
    }

    /// Query `health_status` again.
    pub async fn health_status(&self, ctx: &CallContext) -> Result<String> {
        Ok(self.rpc.call(ctx, HEALTH_STATUS_METHOD, [(); 0]).await?)
    }

    /// Sign `tx` remotely and return the signed transaction.
    ///
    /// Suspends until the signer answers or `ctx` ends. An already-ended
    /// context fails without any network traffic.
    pub async fn sign_transaction(
        &self,
        ctx: &CallContext,
        tx: impl Into<TypedTransaction>,
    ) -> Result<TxEnvelope> {
        let mut request = SigningRequest::from_transaction(tx);
        if let Some(from) = self.from {
            request = request.with_from(from);
        }
        self.sign_request(ctx, &request).await
    }

    /// Send a prepared [`SigningRequest`] as-is.
    pub async fn sign_request(
        &self,
        ctx: &CallContext,
        request: &SigningRequest,
    ) -> Result<TxEnvelope> {
        let raw: Bytes = self
            .rpc
            .call(ctx, SIGN_TRANSACTION_METHOD, [request])
            .await?;

        let envelope = decode_signed_transaction(&raw)?;
        tracing::debug!(
            hash = %envelope.tx_hash(),
            nonce = ?request.as_request().nonce,
            "Transaction signed remotely"
        );
        Ok(envelope)
    }
}
