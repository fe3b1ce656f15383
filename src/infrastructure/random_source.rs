// Thread-local RNG backed metric source
use crate::application::metric_source::MetricSource;
use crate::domain::metrics::{MetricRange, generate_random_value};

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl MetricSource for ThreadRngSource {
    fn sample(&self, range: MetricRange) -> f64 {
        generate_random_value(range.lo, range.hi)
    }
}
