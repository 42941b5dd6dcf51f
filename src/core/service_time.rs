use super::errors::{SimResult, SimulationError};
use super::types::{ProductType, SimTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal, Uniform};
use std::collections::HashMap;

/// Source of service durations for one product type.
///
/// Implementations must never return a negative duration.
pub trait DurationSampler: Send {
    fn sample(&mut self) -> SimTime;
}

impl<F> DurationSampler for F
where
    F: FnMut() -> SimTime + Send,
{
    fn sample(&mut self) -> SimTime {
        self().max(0.0)
    }
}

/// Always the same duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDuration(pub SimTime);

impl DurationSampler for FixedDuration {
    fn sample(&mut self) -> SimTime {
        self.0.max(0.0)
    }
}

/// Draws from a `rand_distr` distribution with its own seeded RNG.
/// Negative draws are clamped to zero.
#[derive(Debug, Clone)]
pub struct SampledDuration<D> {
    distribution: D,
    rng: StdRng,
}

impl<D: Distribution<f64>> SampledDuration<D> {
    pub fn new(distribution: D, seed: u64) -> Self {
        Self {
            distribution,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SampledDuration<Exp<f64>> {
    /// Exponentially distributed durations with the given mean
    pub fn exponential(mean: SimTime, seed: u64) -> SimResult<Self> {
        if !(mean > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "exponential mean must be positive, got {}",
                mean
            )));
        }
        let distribution = Exp::new(1.0 / mean)
            .map_err(|e| SimulationError::InvalidConfig(format!("exponential: {}", e)))?;
        Ok(Self::new(distribution, seed))
    }
}

impl SampledDuration<Normal<f64>> {
    pub fn normal(mean: SimTime, std_dev: SimTime, seed: u64) -> SimResult<Self> {
        let distribution = Normal::new(mean, std_dev)
            .map_err(|e| SimulationError::InvalidConfig(format!("normal: {}", e)))?;
        Ok(Self::new(distribution, seed))
    }
}

impl SampledDuration<Uniform<f64>> {
    /// Uniform on `[low, high)`
    pub fn uniform(low: SimTime, high: SimTime, seed: u64) -> SimResult<Self> {
        if !(low < high) || !low.is_finite() || !high.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "uniform range [{}, {}) is empty or unbounded",
                low, high
            )));
        }
        Ok(Self::new(Uniform::new(low, high), seed))
    }
}

impl<D> DurationSampler for SampledDuration<D>
where
    D: Distribution<f64> + Send,
{
    fn sample(&mut self) -> SimTime {
        self.distribution.sample(&mut self.rng).max(0.0)
    }
}

/// Per-run registry mapping each product type to its duration generator
#[derive(Default)]
pub struct ServiceTimes {
    samplers: HashMap<ProductType, Box<dyn DurationSampler>>,
}

impl ServiceTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration
    pub fn with(mut self, product_type: ProductType, sampler: impl DurationSampler + 'static) -> Self {
        self.insert(product_type, sampler);
        self
    }

    /// Register (or replace) the generator for `product_type`
    pub fn insert(&mut self, product_type: ProductType, sampler: impl DurationSampler + 'static) {
        self.samplers.insert(product_type, Box::new(sampler));
    }

    pub fn contains(&self, product_type: &ProductType) -> bool {
        self.samplers.contains_key(product_type)
    }

    /// Draw one duration for `product_type`
    pub fn sample(&mut self, product_type: &ProductType) -> SimResult<SimTime> {
        self.samplers
            .get_mut(product_type)
            .map(|sampler| sampler.sample())
            .ok_or_else(|| SimulationError::NoServiceTime {
                product_type: product_type.clone(),
            })
    }
}

impl std::fmt::Debug for ServiceTimes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceTimes")
            .field("product_types", &self.samplers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_duration() {
        let mut sampler = FixedDuration(4.5);
        assert_eq!(sampler.sample(), 4.5);
        assert_eq!(FixedDuration(-1.0).sample(), 0.0);
    }

    #[test]
    fn test_seeded_samplers_are_reproducible() {
        let mut a = SampledDuration::exponential(30.0, 7).unwrap();
        let mut b = SampledDuration::exponential(30.0, 7).unwrap();
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_normal_draws_are_clamped_non_negative() {
        let mut sampler = SampledDuration::normal(0.0, 10.0, 3).unwrap();
        assert!((0..200).map(|_| sampler.sample()).all(|d| d >= 0.0));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(SampledDuration::exponential(0.0, 1).is_err());
        assert!(SampledDuration::normal(1.0, -1.0, 1).is_err());
        assert!(SampledDuration::uniform(5.0, 5.0, 1).is_err());
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let mut sampler = SampledDuration::uniform(2.0, 3.0, 11).unwrap();
        for _ in 0..100 {
            let d = sampler.sample();
            assert!((2.0..3.0).contains(&d));
        }
    }

    #[test]
    fn test_registry_lookup() {
        let widget = ProductType::new("widget");
        let mut counter = 0.0;
        let mut service_times = ServiceTimes::new()
            .with(widget.clone(), FixedDuration(12.0))
            .with(ProductType::new("gadget"), move || {
                counter += 1.0;
                counter
            });

        assert!(service_times.contains(&widget));
        assert_eq!(service_times.sample(&widget).unwrap(), 12.0);
        assert_eq!(service_times.sample(&ProductType::new("gadget")).unwrap(), 1.0);
        assert_eq!(service_times.sample(&ProductType::new("gadget")).unwrap(), 2.0);

        let err = service_times.sample(&ProductType::new("unknown")).unwrap_err();
        assert!(matches!(err, SimulationError::NoServiceTime { .. }));
    }
}
