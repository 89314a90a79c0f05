//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber for binaries
//! - Adapt the certificate watcher's log hook onto `tracing`
//!
//! `RUST_LOG` wins over the configured level when set.

use std::fmt;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::tls::watcher::CertLogger;

/// Install a global `fmt` subscriber filtered at `log_level` for this crate.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("remote_signer_client={log_level},signer_cli={log_level}").into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// [`CertLogger`] that forwards watcher messages to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl CertLogger for TracingLogger {
    fn printf(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "remote_signer_client::tls::watcher", "{}", args);
    }
}
