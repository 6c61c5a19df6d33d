//! One generator run: simulate, shape the report, write it out

use crate::config::GeneratorConfig;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use usage_lib::report::{ReportWriter, ResourceUsageReport};
use usage_lib::simulation::Session;
use usage_lib::{GeneratorMetrics, StructuredLogger};

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub samples: usize,
    pub executors: usize,
    pub bytes: usize,
    pub destination: String,
}

/// Generate the configured samples and write the report to its destination
pub fn run(
    config: &GeneratorConfig,
    logger: &StructuredLogger,
    metrics: &GeneratorMetrics,
) -> Result<RunSummary> {
    let mut session = Session::new(config.session_config())
        .context("Invalid session configuration")?
        .with_metrics(metrics.clone());

    logger.log_session_started(
        session.seed(),
        session.current_time(),
        config.frameworks,
        session.executor_count(),
        config.samples,
    );

    let mut samples = Vec::with_capacity(config.samples);
    for _ in 0..config.samples {
        let sample = session.sample().context("Failed to capture sample")?;
        let total_user_time: f64 = sample
            .executor_snapshots
            .iter()
            .map(|s| s.usage.user_time_secs)
            .sum();
        logger.log_sample(sample.timestamp, sample.executor_count(), total_user_time);
        samples.push(sample);
    }

    let report = ResourceUsageReport::from_samples(&samples);
    let writer = ReportWriter::new(config.format);

    let (bytes, destination) = match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file {}", path.display()))?;
            let bytes = writer
                .write(&report, BufWriter::new(file))
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            (bytes, path.display().to_string())
        }
        None => {
            let stdout = io::stdout();
            let bytes = writer
                .write(&report, stdout.lock())
                .context("Failed to write report to stdout")?;
            (bytes, "stdout".to_string())
        }
    };

    metrics.set_report_bytes(bytes as i64);
    logger.log_report_written(&destination, samples.len(), bytes);

    Ok(RunSummary {
        seed: session.seed(),
        samples: samples.len(),
        executors: session.executor_count(),
        bytes,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_lib::report::{validate_report, FixtureSource};

    #[test]
    fn test_run_writes_valid_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        let config = GeneratorConfig {
            frameworks: 2,
            executors_per_framework: 2,
            samples: 5,
            seed: Some(12),
            start_time: Some(100),
            output: Some(path.clone()),
            ..Default::default()
        };

        let summary = run(
            &config,
            &StructuredLogger::new("test-run"),
            &GeneratorMetrics::new(),
        )
        .unwrap();

        assert_eq!(summary.seed, 12);
        assert_eq!(summary.samples, 5);
        assert_eq!(summary.executors, 4);
        assert_eq!(summary.bytes as u64, std::fs::metadata(&path).unwrap().len());

        let source = FixtureSource::from_path(&path).unwrap();
        assert_eq!(source.report().executor_counts(), vec![4; 5]);
        assert!(validate_report(source.report()).is_valid());
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = GeneratorConfig {
            samples: 0,
            ..Default::default()
        };

        let err = run(
            &config,
            &StructuredLogger::new("test-run"),
            &GeneratorMetrics::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid session configuration"));
    }

    #[test]
    fn test_run_fails_on_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            samples: 2,
            seed: Some(1),
            output: Some(dir.path().join("missing").join("usage.json")),
            ..Default::default()
        };

        let result = run(
            &config,
            &StructuredLogger::new("test-run"),
            &GeneratorMetrics::new(),
        );
        assert!(result.is_err());
    }
}
