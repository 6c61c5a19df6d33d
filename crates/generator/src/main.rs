//! Usage Generator - synthetic executor resource usage reports
//!
//! Simulates a cluster of frameworks and executors and writes the sampled
//! allocation and usage as a JSON report. Logs go to stderr so the report
//! can be piped from stdout.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use usage_lib::report::ReportFormat;
use usage_lib::{GeneratorMetrics, StructuredLogger};

mod config;
mod run;

const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate synthetic executor resource usage reports
#[derive(Parser, Debug)]
#[command(name = "usage-gen")]
#[command(author, version, about = "Generate synthetic executor resource usage reports", long_about = None)]
struct Args {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Number of simulated frameworks
    #[arg(long, short)]
    frameworks: Option<usize>,

    /// Executors per framework
    #[arg(long, short)]
    executors: Option<usize>,

    /// Number of samples to generate
    #[arg(long, short)]
    samples: Option<usize>,

    /// Random seed for a reproducible report
    #[arg(long)]
    seed: Option<u64>,

    /// Initial simulated clock in epoch seconds
    #[arg(long)]
    start_time: Option<i64>,

    /// Minimum cpus allocated to an executor
    #[arg(long)]
    cpus_min: Option<u32>,

    /// Maximum cpus allocated to an executor
    #[arg(long)]
    cpus_max: Option<u32>,

    /// Minimum memory allocated to an executor, in MB
    #[arg(long)]
    mem_min_mb: Option<u64>,

    /// Maximum memory allocated to an executor, in MB
    #[arg(long)]
    mem_max_mb: Option<u64>,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Emit the report on a single line
    #[arg(long)]
    compact: bool,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    metrics: bool,
}

impl Args {
    /// Flags take precedence over file and environment settings
    fn apply(&self, config: &mut config::GeneratorConfig) {
        if let Some(frameworks) = self.frameworks {
            config.frameworks = frameworks;
        }
        if let Some(executors) = self.executors {
            config.executors_per_framework = executors;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.start_time.is_some() {
            config.start_time = self.start_time;
        }
        if let Some(cpus_min) = self.cpus_min {
            config.cpus_min = cpus_min;
        }
        if let Some(cpus_max) = self.cpus_max {
            config.cpus_max = cpus_max;
        }
        if let Some(mem_min_mb) = self.mem_min_mb {
            config.mem_min_mb = mem_min_mb;
        }
        if let Some(mem_max_mb) = self.mem_max_mb {
            config.mem_max_mb = mem_max_mb;
        }
        if self.output.is_some() {
            config.output = self.output.clone();
        }
        if self.compact {
            config.format = ReportFormat::Compact;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing with JSON output on stderr and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let started = Instant::now();
    let logger = StructuredLogger::new(uuid::Uuid::new_v4().to_string());
    logger.log_startup(GENERATOR_VERSION);

    let mut config = config::GeneratorConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    info!(
        frameworks = config.frameworks,
        executors_per_framework = config.executors_per_framework,
        samples = config.samples,
        "Generator configured"
    );

    let metrics = GeneratorMetrics::new();
    let summary = match run::run(&config, &logger, &metrics) {
        Ok(summary) => summary,
        Err(e) => {
            logger.log_failure("run", &format!("{:#}", e));
            return Err(e);
        }
    };

    if args.metrics {
        eprint!("{}", metrics.render()?);
    }

    info!(
        seed = summary.seed,
        samples = summary.samples,
        executors = summary.executors,
        bytes = summary.bytes,
        destination = %summary.destination,
        "Report complete"
    );
    logger.log_finished(started.elapsed().as_millis());

    Ok(())
}
