//! Observability for Safe transaction classification.

pub mod metrics;
pub mod logging;

pub use metrics::Metrics;
pub use logging::{init_logging, LogFormat};
