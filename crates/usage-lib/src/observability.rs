//! Observability infrastructure for the usage generator
//!
//! Provides:
//! - Prometheus metrics (samples, snapshots, sample build latency, report size)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Encoder, Histogram,
    IntCounter, IntGauge, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for sample build latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.000001, 0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<GeneratorMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct GeneratorMetricsInner {
    samples_generated: IntCounter,
    snapshots_generated: IntCounter,
    sample_build_seconds: Histogram,
    report_bytes: IntGauge,
    executors: IntGauge,
}

impl GeneratorMetricsInner {
    fn new() -> Self {
        Self {
            samples_generated: register_int_counter!(
                "usage_generator_samples_generated_total",
                "Total number of samples captured from the simulated cluster"
            )
            .expect("Failed to register samples_generated"),

            snapshots_generated: register_int_counter!(
                "usage_generator_snapshots_generated_total",
                "Total number of executor snapshots captured"
            )
            .expect("Failed to register snapshots_generated"),

            sample_build_seconds: register_histogram!(
                "usage_generator_sample_build_seconds",
                "Time spent capturing one sample",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register sample_build_seconds"),

            report_bytes: register_int_gauge!(
                "usage_generator_report_bytes",
                "Size of the last rendered report in bytes"
            )
            .expect("Failed to register report_bytes"),

            executors: register_int_gauge!(
                "usage_generator_executors",
                "Number of executors in the simulated cluster"
            )
            .expect("Failed to register executors"),
        }
    }
}

/// Generator metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct GeneratorMetrics {
    _private: (),
}

impl Default for GeneratorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(GeneratorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &GeneratorMetricsInner {
        GLOBAL_METRICS.get_or_init(GeneratorMetricsInner::new)
    }

    /// Record how long one sample took to capture
    pub fn observe_sample_build(&self, duration_secs: f64) {
        self.inner().sample_build_seconds.observe(duration_secs);
    }

    pub fn inc_samples_generated(&self) {
        self.inner().samples_generated.inc();
    }

    pub fn add_snapshots_generated(&self, count: u64) {
        self.inner().snapshots_generated.inc_by(count);
    }

    pub fn set_report_bytes(&self, bytes: i64) {
        self.inner().report_bytes.set(bytes);
    }

    pub fn set_executors(&self, count: i64) {
        self.inner().executors.set(count);
    }

    pub fn samples_generated(&self) -> u64 {
        self.inner().samples_generated.get()
    }

    pub fn snapshots_generated(&self) -> u64 {
        self.inner().snapshots_generated.get()
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Structured logger for generator events
///
/// Provides consistent JSON-formatted logging for session lifecycle and
/// report output.
#[derive(Clone)]
pub struct StructuredLogger {
    run_id: String,
}

impl StructuredLogger {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Log generator startup
    pub fn log_startup(&self, version: &str) {
        info!(
            event = "generator_started",
            run_id = %self.run_id,
            generator_version = %version,
            "Usage generator started"
        );
    }

    /// Log a session construction
    pub fn log_session_started(
        &self,
        seed: u64,
        start_time: i64,
        frameworks: usize,
        executors: usize,
        samples: usize,
    ) {
        info!(
            event = "session_started",
            run_id = %self.run_id,
            seed = seed,
            start_time = start_time,
            frameworks = frameworks,
            executors = executors,
            samples = samples,
            "Simulation session started"
        );
    }

    /// Log a captured sample
    pub fn log_sample(&self, timestamp: i64, executors: usize, total_user_time_secs: f64) {
        debug!(
            event = "sample_generated",
            run_id = %self.run_id,
            timestamp = timestamp,
            executors = executors,
            total_user_time_secs = total_user_time_secs,
            "Sample generated"
        );
    }

    /// Log a report written to its destination
    pub fn log_report_written(&self, destination: &str, samples: usize, bytes: usize) {
        info!(
            event = "report_written",
            run_id = %self.run_id,
            destination = %destination,
            samples = samples,
            bytes = bytes,
            "Usage report written"
        );
    }

    /// Log a failed run
    pub fn log_failure(&self, stage: &str, error: &str) {
        warn!(
            event = "generator_failed",
            run_id = %self.run_id,
            stage = %stage,
            error = %error,
            "Usage generation failed"
        );
    }

    /// Log generator completion
    pub fn log_finished(&self, elapsed_ms: u128) {
        info!(
            event = "generator_finished",
            run_id = %self.run_id,
            elapsed_ms = elapsed_ms as u64,
            "Usage generator finished"
        );
    }
}
