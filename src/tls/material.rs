//! PEM loading for trust anchors and client certificate/key pairs.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;
use rustls::{InconsistentKeys, RootCertStore};

use crate::config::ConfigError;

/// Crypto provider used for every TLS object built by this crate.
///
/// Passed explicitly so no process-wide default has to be installed.
pub fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

fn open(path: &Path) -> Result<BufReader<File>, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Read every `CERTIFICATE` block from a PEM file.
///
/// Fails if the file holds none.
pub fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ConfigError> {
    let mut reader = open(path)?;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConfigError::Pem {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if certs.is_empty() {
        return Err(ConfigError::Pem {
            path: path.to_path_buf(),
            reason: "no certificates found".to_string(),
        });
    }
    Ok(certs)
}

/// Read the first private key (PKCS#8, SEC1 or PKCS#1) from a PEM file.
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, ConfigError> {
    let mut reader = open(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| ConfigError::Pem {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| ConfigError::Pem {
            path: path.to_path_buf(),
            reason: "no private key found".to_string(),
        })
}

/// Load a certificate chain and its private key as a ready-to-present pair.
///
/// The key must parse for `provider` and match the leaf certificate.
pub fn load_certified_key(
    cert_path: &Path,
    key_path: &Path,
    provider: &CryptoProvider,
) -> Result<CertifiedKey, ConfigError> {
    let chain = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let signing_key = provider
        .key_provider
        .load_private_key(key)
        .map_err(|e| ConfigError::KeyPair(e.to_string()))?;

    let certified = CertifiedKey::new(chain, signing_key);
    match certified.keys_match() {
        // Some key types cannot report their public half; accept those.
        Ok(()) | Err(rustls::Error::InconsistentKeys(InconsistentKeys::Unknown)) => Ok(certified),
        Err(e) => Err(ConfigError::KeyPair(e.to_string())),
    }
}

/// Build the trust store from a CA bundle.
///
/// At least one certificate must be accepted as a trust anchor.
pub fn load_root_store(ca_path: &Path) -> Result<RootCertStore, ConfigError> {
    let certs = load_certs(ca_path)?;

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs);
    if added == 0 {
        return Err(ConfigError::EmptyTrustStore(ca_path.to_path_buf()));
    }
    if ignored > 0 {
        tracing::warn!(path = ?ca_path, ignored, "Ignored unparsable certificates in CA bundle");
    }

    Ok(roots)
}
