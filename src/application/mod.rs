// Application layer - Console session and telemetry use cases
pub mod console_session;
pub mod metric_source;
pub mod telemetry_engine;
