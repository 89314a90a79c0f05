//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → SignerConfig (validated, immutable)
//!     → consumed once by SignerClient::from_config
//! ```
//!
//! Certificate and key files named here are not part of the config
//! lifecycle; they are watched and reloaded by `tls::watcher`.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{ObservabilityConfig, SignerConfig, TlsConfig, TransportConfig};
pub use validation::ValidationError;
