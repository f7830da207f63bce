//! Logging facade and per-run product counters.

pub mod log;
pub mod metrics;

pub use log::LogManager;
pub use metrics::MetricsRecorder;
