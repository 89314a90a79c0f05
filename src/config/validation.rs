//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Endpoint must be an https URL
//! - TLS paths and timeouts must be set
//!
//! Returns all validation errors, not just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::SignerConfig;

/// A single semantic problem with a [`SignerConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoint is empty")]
    EmptyEndpoint,

    #[error("endpoint '{endpoint}' is not a valid URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("endpoint scheme '{0}' is not supported, expected https")]
    UnsupportedScheme(String),

    #[error("tls.{0} path is empty")]
    EmptyTlsPath(&'static str),

    #[error("transport.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &SignerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoint.trim().is_empty() {
        errors.push(ValidationError::EmptyEndpoint);
    } else {
        match Url::parse(&config.endpoint) {
            Ok(url) if url.scheme() != "https" => {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let tls = &config.tls;
    for (name, path) in [("ca_cert", &tls.ca_cert), ("cert", &tls.cert), ("key", &tls.key)] {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyTlsPath(name));
        }
    }

    if config.transport.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
