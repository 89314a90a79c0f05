//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! tls, rpc and signer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - The library only emits; subscribers and exporters belong to the host
//! - Never log key material or signed payloads

pub mod logging;
pub mod metrics;
