//! Observability setup for edgechat: structured logging via `tracing` and
//! optional OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{ObserveConfig, init_tracing, shutdown_tracing};
