// Measurement ranges and bounded random sampling
use rand::Rng;

/// Inclusive bounds for one simulated measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub lo: f64,
    pub hi: f64,
}

impl MetricRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    #[cfg(test)]
    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }
}

pub const FLOW_RATE: MetricRange = MetricRange::new(10.0, 100.0);
pub const PH: MetricRange = MetricRange::new(6.0, 9.0);
pub const INLET_PRESSURE: MetricRange = MetricRange::new(20.0, 40.0);
pub const OUTLET_PRESSURE: MetricRange = MetricRange::new(10.0, 30.0);
pub const TOTAL_WEIGHT: MetricRange = MetricRange::new(50.0, 200.0);
pub const CIRCULATION_TIME: MetricRange = MetricRange::new(0.0, 24.0);
pub const SOAKING_TIME: MetricRange = MetricRange::new(0.0, 12.0);

/// Uniform sample in `[lo, hi]` drawn from `rng`.
///
/// Callers must keep `lo <= hi`; a degenerate range yields `lo`.
pub fn sample_uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if lo == hi {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Uniform sample in `[lo, hi]` from the thread-local generator
pub fn generate_random_value(lo: f64, hi: f64) -> f64 {
    sample_uniform(&mut rand::thread_rng(), lo, hi)
}
