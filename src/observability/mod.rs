//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or the configured level)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments) and no-ops until a recorder is installed
//! - Logging is initialized once; later calls are ignored

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
