// Domain layer - Console rules and telemetry models
pub mod credentials;
pub mod metrics;
pub mod telemetry;
pub mod unit_selection;
