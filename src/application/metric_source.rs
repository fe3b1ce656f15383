// Source trait for simulated measurements
use crate::domain::metrics::MetricRange;

/// Supplies one sample per measurement; implementations must stay within `range`.
pub trait MetricSource: Send + Sync {
    fn sample(&self, range: MetricRange) -> f64;
}
