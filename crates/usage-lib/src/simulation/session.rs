//! Simulated clock driving sample generation
//!
//! The session owns every framework and a seeded random generator. Each
//! call to [`Session::sample`] moves the clock forward by exactly one tick,
//! which keeps every executor's elapsed time at 1 after its first sample.

use super::{AllocationRange, Framework, SessionConfig};
use crate::error::{GeneratorError, Result};
use crate::models::{FrameworkId, Sample};
use crate::observability::GeneratorMetrics;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Simulated time added per sample
pub const TICK: i64 = 1;

/// Owns the simulated cluster and advances its clock
pub struct Session {
    /// Last tick handed out (the start time before the first sample)
    current_time: i64,
    frameworks: Vec<Framework>,
    /// Framework id to position in `frameworks`
    framework_index: HashMap<FrameworkId, usize>,
    rng: ChaCha8Rng,
    seed: u64,
    samples: usize,
    metrics: Option<GeneratorMetrics>,
}

impl Session {
    /// Validate `config` and build the frameworks and executors it describes
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let current_time = config
            .start_time
            .unwrap_or_else(|| chrono::Utc::now().timestamp());

        let frameworks: Vec<Framework> = (0..config.frameworks)
            .map(|_| Framework::new(config.executors_per_framework, &config.allocation, &mut rng))
            .collect();

        let framework_index = frameworks
            .iter()
            .enumerate()
            .map(|(position, framework)| (framework.id(), position))
            .collect();

        info!(
            seed = seed,
            start_time = current_time,
            frameworks = config.frameworks,
            executors_per_framework = config.executors_per_framework,
            samples = config.samples,
            "Session initialized"
        );

        Ok(Self {
            current_time,
            frameworks,
            framework_index,
            rng,
            seed,
            samples: config.samples,
            metrics: None,
        })
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Record sample counts and build latency into `metrics`
    pub fn with_metrics(mut self, metrics: GeneratorMetrics) -> Self {
        metrics.set_executors(self.executor_count() as i64);
        self.metrics = Some(metrics);
        self
    }

    /// Seed of the session's random generator; reuse it to replay a run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    /// Number of samples [`generate`](Self::generate) produces
    pub fn configured_samples(&self) -> usize {
        self.samples
    }

    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    /// Look up the framework an executor's `framework_id` refers to
    pub fn framework(&self, id: FrameworkId) -> Option<&Framework> {
        self.framework_index
            .get(&id)
            .map(|&position| &self.frameworks[position])
    }

    /// Total executors across all frameworks
    pub fn executor_count(&self) -> usize {
        self.frameworks.iter().map(Framework::executor_count).sum()
    }

    /// Advance the clock by one tick and capture every executor
    pub fn sample(&mut self) -> Result<Sample> {
        let start = Instant::now();

        let timestamp = self
            .current_time
            .checked_add(TICK)
            .ok_or(GeneratorError::ClockOverflow {
                current: self.current_time,
            })?;
        let sample = Sample::capture(timestamp, &mut self.frameworks, &mut self.rng)?;
        self.current_time = timestamp;

        if let Some(metrics) = &self.metrics {
            metrics.observe_sample_build(start.elapsed().as_secs_f64());
            metrics.inc_samples_generated();
            metrics.add_snapshots_generated(sample.executor_count() as u64);
        }

        debug!(
            timestamp = sample.timestamp,
            executors = sample.executor_count(),
            "Sample captured"
        );

        Ok(sample)
    }

    /// Take `count` consecutive samples
    pub fn take(&mut self, count: usize) -> Result<Vec<Sample>> {
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            samples.push(self.sample()?);
        }
        Ok(samples)
    }

    /// Take the configured number of samples
    pub fn generate(&mut self) -> Result<Vec<Sample>> {
        let samples = self.take(self.samples)?;

        info!(
            samples = samples.len(),
            last_timestamp = self.current_time,
            "Session generation complete"
        );

        Ok(samples)
    }
}

/// Builder for [`Session`] with [`SessionConfig`] defaults
pub struct SessionBuilder {
    config: SessionConfig,
    metrics: Option<GeneratorMetrics>,
}

impl SessionBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            metrics: None,
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn frameworks(mut self, count: usize) -> Self {
        self.config.frameworks = count;
        self
    }

    pub fn executors_per_framework(mut self, count: usize) -> Self {
        self.config.executors_per_framework = count;
        self
    }

    pub fn samples(mut self, count: usize) -> Self {
        self.config.samples = count;
        self
    }

    pub fn allocation(mut self, range: AllocationRange) -> Self {
        self.config.allocation = range;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn start_time(mut self, start_time: i64) -> Self {
        self.config.start_time = Some(start_time);
        self
    }

    pub fn metrics(mut self, metrics: GeneratorMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the session, validating the accumulated configuration
    pub fn build(self) -> Result<Session> {
        let session = Session::new(self.config)?;
        Ok(match self.metrics {
            Some(metrics) => session.with_metrics(metrics),
            None => session,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
