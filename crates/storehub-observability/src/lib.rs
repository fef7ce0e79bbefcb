//! StoreHub Observability Module
//!
//! - Structured logging through `tracing`, to the console (compact or JSON)
//!   and optionally to daily rolling files
//! - HTTP request logging middleware
//! - Prometheus metrics: request counters and latency plus the
//!   authentication and authorization business counters
//!
//! # Examples
//!
//! ```no_run
//! use storehub_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     let handle = init_metrics()?;
//!     // ... application code ...
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use metrics_exporter_prometheus::PrometheusHandle;

pub use logging::{LogFormat, LoggingOptions, init_tracing, logging_middleware};
pub use metrics::{
    init_metrics, metrics_middleware, track_authorization_denied, track_login_failure,
    track_login_success, track_registration,
};
