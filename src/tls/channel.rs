//! Secure channel construction.
//!
//! Produces a `reqwest::Client` that speaks TLS 1.3 only, trusts exactly the
//! configured CA bundle and presents whatever certificate the
//! [`CertWatcher`] holds at handshake time.

use std::sync::Arc;
use std::time::Duration;

use rustls::client::ResolvesClientCert;
use rustls::sign::CertifiedKey;
use rustls::{ClientConfig, SignatureScheme};

use crate::config::{ConfigError, TlsConfig, TransportConfig};
use crate::tls::material::{crypto_provider, load_root_store};
use crate::tls::watcher::CertWatcher;

/// Client certificate resolver backed by the watcher.
///
/// Queried on every handshake, so a rotated pair is used by the next new
/// connection without rebuilding the client.
#[derive(Debug)]
struct WatcherCertResolver {
    watcher: Arc<CertWatcher>,
}

impl ResolvesClientCert for WatcherCertResolver {
    fn resolve(
        &self,
        _root_hint_subjects: &[&[u8]],
        _sigschemes: &[SignatureScheme],
    ) -> Option<Arc<CertifiedKey>> {
        Some(self.watcher.current_certificate())
    }

    fn has_certs(&self) -> bool {
        true
    }
}

/// rustls client configuration for mutual TLS 1.3 against `trust.ca_cert`.
pub fn client_tls_config(
    trust: &TlsConfig,
    watcher: Arc<CertWatcher>,
) -> Result<ClientConfig, ConfigError> {
    let roots = load_root_store(&trust.ca_cert)?;

    let config = ClientConfig::builder_with_provider(crypto_provider())
        .with_protocol_versions(&[&rustls::version::TLS13])?
        .with_root_certificates(roots)
        .with_client_cert_resolver(Arc::new(WatcherCertResolver { watcher }));

    Ok(config)
}

/// Build the HTTPS transport used for all RPC traffic.
///
/// Fails with [`ConfigError`] if the CA bundle yields no trust anchors.
pub fn build(
    trust: &TlsConfig,
    watcher: Arc<CertWatcher>,
    options: &TransportConfig,
) -> Result<reqwest::Client, ConfigError> {
    let tls = client_tls_config(trust, watcher)?;

    let client = reqwest::Client::builder()
        .use_preconfigured_tls(tls)
        .https_only(true)
        .no_proxy()
        .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
        .pool_max_idle_per_host(options.pool_max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(options.pool_idle_timeout_secs))
        .build()
        .map_err(ConfigError::HttpClient)?;

    tracing::debug!(ca = ?trust.ca_cert, "Secure channel built");
    Ok(client)
}
