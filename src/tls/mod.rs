//! Mutual TLS subsystem.
//!
//! # Data Flow
//! ```text
//! client cert/key files (PEM)
//!     → material.rs (parse, check pair)
//!     → watcher.rs (notify events → reload → atomic swap)
//!
//! CA bundle (PEM)
//!     → material.rs (root store)
//!     → channel.rs (rustls ClientConfig, TLS 1.3 only)
//!     → reqwest::Client
//!
//! On every handshake:
//!     rustls → channel.rs resolver → watcher.current_certificate()
//! ```
//!
//! # Design Decisions
//! - The certificate pair is the only mutable shared state, swapped whole
//! - The `ring` provider is passed explicitly; no global default is installed
//! - CA trust is fixed for the life of the client

pub mod channel;
pub mod material;
pub mod watcher;

pub use watcher::{CertLogger, CertWatcher};
