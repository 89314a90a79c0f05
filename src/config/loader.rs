//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::SignerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `endpoint`.
pub const ENDPOINT_ENV_VAR: &str = "SIGNER_ENDPOINT";
/// Environment variable overriding `address`.
pub const ADDRESS_ENV_VAR: &str = "SIGNER_ADDRESS";
/// Environment variable overriding `tls.ca_cert`.
pub const TLS_CA_ENV_VAR: &str = "SIGNER_TLS_CA";
/// Environment variable overriding `tls.cert`.
pub const TLS_CERT_ENV_VAR: &str = "SIGNER_TLS_CERT";
/// Environment variable overriding `tls.key`.
pub const TLS_KEY_ENV_VAR: &str = "SIGNER_TLS_KEY";

/// Malformed or unreadable configuration or TLS material.
///
/// Fatal to client construction and never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvOverride { var: &'static str, reason: String },

    #[error("invalid PEM in {path:?}: {reason}")]
    Pem { path: PathBuf, reason: String },

    #[error("CA bundle {0:?} contains no usable trust anchors")]
    EmptyTrustStore(PathBuf),

    #[error("invalid certificate/key pair: {0}")]
    KeyPair(String),

    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("failed to watch certificate files: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, apply environment overrides and
/// validate the result.
pub fn load_config(path: &Path) -> Result<SignerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: SignerConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build configuration from defaults plus environment variables only.
pub fn load_from_env() -> Result<SignerConfig, ConfigError> {
    let mut config = SignerConfig::default();
    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Override config fields from `lookup` (normally the process environment).
pub fn apply_env_overrides<F>(config: &mut SignerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup(ENDPOINT_ENV_VAR) {
        config.endpoint = endpoint;
    }
    if let Some(address) = lookup(ADDRESS_ENV_VAR) {
        let parsed = address.parse::<Address>().map_err(|e| ConfigError::InvalidEnvOverride {
            var: ADDRESS_ENV_VAR,
            reason: format!("{e}"),
        })?;
        config.address = Some(parsed);
    }
    if let Some(ca) = lookup(TLS_CA_ENV_VAR) {
        config.tls.ca_cert = ca.into();
    }
    if let Some(cert) = lookup(TLS_CERT_ENV_VAR) {
        config.tls.cert = cert.into();
    }
    if let Some(key) = lookup(TLS_KEY_ENV_VAR) {
        config.tls.key = key.into();
    }
    Ok(())
}
