//! Client certificate watcher for hot rotation.
//!
//! # Responsibilities
//! - Load the initial certificate/key pair, failing fast if invalid
//! - Watch the containing directories and reload on create/modify/rename
//! - Serve the last known-good pair to the TLS layer without locking
//!
//! # Design Decisions
//! - Reload runs on the notify thread; readers never wait for it
//! - A failed reload keeps the previous pair and is only logged
//! - The watch handle is released on `stop()` or drop, whichever comes first
//!
//! Events are matched on the two file names only. Rotations that swap a
//! symlinked directory (the Kubernetes `..data` layout) touch neither name;
//! hosts using that layout must call [`CertWatcher::reload`] themselves.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use rustls::crypto::CryptoProvider;
use rustls::sign::CertifiedKey;

use crate::config::ConfigError;
use crate::observability::metrics;
use crate::tls::material::{crypto_provider, load_certified_key};

/// Minimal logging capability the watcher needs.
///
/// Any logger that can take a formatted message works; see
/// [`TracingLogger`](crate::observability::logging::TracingLogger).
pub trait CertLogger: Send + Sync {
    fn printf(&self, args: fmt::Arguments<'_>);
}

/// Shared between the watcher handle and the notify callback.
struct CertStore {
    cert_path: PathBuf,
    key_path: PathBuf,
    watched_names: BTreeSet<OsString>,
    provider: Arc<CryptoProvider>,
    logger: Arc<dyn CertLogger>,
    current: ArcSwap<CertifiedKey>,
}

impl CertStore {
    fn reload(&self) -> Result<(), ConfigError> {
        match load_certified_key(&self.cert_path, &self.key_path, &self.provider) {
            Ok(key) => {
                self.current.store(Arc::new(key));
                metrics::record_cert_reload(true);
                self.logger.printf(format_args!(
                    "Reloaded certificate {:?} and key {:?}",
                    self.cert_path, self.key_path
                ));
                Ok(())
            }
            Err(e) => {
                metrics::record_cert_reload(false);
                self.logger.printf(format_args!(
                    "Failed to reload certificate: {}. Keeping current certificate.",
                    e
                ));
                Err(e)
            }
        }
    }

    fn concerns(&self, event: &Event) -> bool {
        (event.kind.is_create() || event.kind.is_modify())
            && event.paths.iter().any(|p| {
                p.file_name()
                    .is_some_and(|name| self.watched_names.contains(name))
            })
    }
}

/// Keeps an in-memory client certificate/key pair fresh as the files change.
pub struct CertWatcher {
    store: Arc<CertStore>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl CertWatcher {
    /// Load the pair at `cert_path`/`key_path` and start watching for changes.
    ///
    /// Fails with [`ConfigError`] if either file is unreadable, the pair does
    /// not parse or match, or the filesystem watch cannot be registered.
    pub fn start(
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
        logger: Arc<dyn CertLogger>,
    ) -> Result<Self, ConfigError> {
        let cert_path = cert_path.as_ref().to_path_buf();
        let key_path = key_path.as_ref().to_path_buf();
        let provider = crypto_provider();

        let initial = load_certified_key(&cert_path, &key_path, &provider)?;

        let watched_names = [&cert_path, &key_path]
            .iter()
            .filter_map(|p| p.file_name().map(OsString::from))
            .collect();

        let store = Arc::new(CertStore {
            cert_path,
            key_path,
            watched_names,
            provider,
            logger,
            current: ArcSwap::from_pointee(initial),
        });

        let callback_store = Arc::clone(&store);
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if callback_store.concerns(&event) {
                        tracing::debug!(paths = ?event.paths, kind = ?event.kind, "Certificate file change detected");
                        // Failure is logged inside reload and the old pair kept.
                        let _ = callback_store.reload();
                    }
                }
                Err(e) => tracing::error!(error = %e, "Certificate watch error"),
            },
            Config::default(),
        )?;

        // On error `watcher` is dropped here, releasing any partial watch.
        for dir in watch_dirs(&store.cert_path, &store.key_path) {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        }

        tracing::info!(
            cert = ?store.cert_path,
            key = ?store.key_path,
            "Certificate watcher started"
        );

        Ok(Self {
            store,
            watcher: Mutex::new(Some(watcher)),
        })
    }

    /// The latest successfully loaded pair.
    pub fn current_certificate(&self) -> Arc<CertifiedKey> {
        self.store.current.load_full()
    }

    /// Reload from disk now.
    ///
    /// On failure the previous pair stays active and the error is returned.
    pub fn reload(&self) -> Result<(), ConfigError> {
        self.store.reload()
    }

    /// Release the filesystem watch. The current pair keeps being served.
    pub fn stop(&self) {
        let watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if watcher.is_some() {
            tracing::info!(cert = ?self.store.cert_path, "Certificate watcher stopped");
        }
    }

    /// Whether the filesystem watch is still registered.
    pub fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for CertWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertWatcher")
            .field("cert_path", &self.store.cert_path)
            .field("key_path", &self.store.key_path)
            .field("watching", &self.is_watching())
            .finish()
    }
}

/// Directories to watch, deduplicated. A bare file name means the cwd.
fn watch_dirs(cert_path: &Path, key_path: &Path) -> BTreeSet<PathBuf> {
    [cert_path, key_path]
        .iter()
        .map(|p| match p.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        })
        .collect()
}
