//! Reading rendered reports back as fixtures
//!
//! A [`FixtureSource`] parses a rendered report and replays its samples,
//! in order, to a [`UsageConsumer`]. Filters and tests use it to feed
//! generated usage through the same path as live usage.

use super::{ResourceUsage, ResourceUsageReport};
use crate::error::{GeneratorError, Result};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Receives replayed samples one at a time
pub trait UsageConsumer {
    fn consume(&mut self, usage: &ResourceUsage) -> Result<()>;
}

impl<F> UsageConsumer for F
where
    F: FnMut(&ResourceUsage) -> Result<()>,
{
    fn consume(&mut self, usage: &ResourceUsage) -> Result<()> {
        self(usage)
    }
}

/// A parsed report together with where it came from
#[derive(Debug, Clone)]
pub struct FixtureSource {
    origin: String,
    report: ResourceUsageReport,
}

impl FixtureSource {
    /// Wrap an in-memory report
    pub fn from_report(report: ResourceUsageReport, origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            report,
        }
    }

    /// Load a report from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path.display().to_string())
    }

    /// Load a report from any reader
    pub fn from_reader<R: Read>(mut reader: R, origin: impl Into<String>) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content, origin)
    }

    /// Parse a report from its JSON text
    pub fn parse(content: &str, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let report: ResourceUsageReport = serde_json::from_str(content)
            .map_err(|e| GeneratorError::InvalidReport(format!("{}: {}", origin, e)))?;

        debug!(
            origin = %origin,
            samples = report.sample_count(),
            "Loaded usage fixture"
        );

        Ok(Self { origin, report })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn report(&self) -> &ResourceUsageReport {
        &self.report
    }

    pub fn into_report(self) -> ResourceUsageReport {
        self.report
    }

    /// Feed every sample to `consumer` in order; stops at the first error
    ///
    /// Returns the number of samples consumed.
    pub fn replay(&self, consumer: &mut dyn UsageConsumer) -> Result<usize> {
        for usage in &self.report.resource_usage {
            consumer.consume(usage)?;
        }
        Ok(self.report.sample_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = r#"{
  "resource_usage": [
    {
      "executors": [
        {
          "allocated": [
            { "name": "cpus", "role": "*", "scalar": { "value": 2 } },
            { "name": "mem", "role": "*", "scalar": { "value": 100 } }
          ],
          "executor_info": {
            "executor_id": { "value": "executor-a" },
            "framework_id": { "value": "framework-a" }
          },
          "statistics": {
            "cpus_limit": 2,
            "cpus_system_time_secs": 0.0,
            "cpus_user_time_secs": 0,
            "mem_limit_bytes": 102400,
            "mem_rss_bytes": 51200.0,
            "timestamp": 11
          }
        }
      ]
    },
    {
      "executors": [
        {
          "allocated": [
            { "name": "cpus", "role": "*", "scalar": { "value": 2 } },
            { "name": "mem", "role": "*", "scalar": { "value": 100 } }
          ],
          "executor_info": {
            "executor_id": { "value": "executor-a" },
            "framework_id": { "value": "framework-a" }
          },
          "statistics": {
            "cpus_limit": 2,
            "cpus_system_time_secs": 0.0,
            "cpus_user_time_secs": 0.5,
            "mem_limit_bytes": 102400,
            "mem_rss_bytes": 14628.571428571428,
            "timestamp": 12
          }
        }
      ]
    }
  ]
}"#;

    #[test]
    fn test_parse_fixture() {
        let source = FixtureSource::parse(FIXTURE, "inline").unwrap();

        assert_eq!(source.origin(), "inline");
        assert_eq!(source.report().sample_count(), 2);
        let usage = &source.report().resource_usage[1];
        assert_eq!(usage.timestamp(), Some(12));
        assert_eq!(usage.executors[0].executor_id(), "executor-a");
        assert_eq!(usage.executors[0].statistics.cpus_user_time_secs, 0.5);
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let source = FixtureSource::from_path(file.path()).unwrap();
        assert_eq!(source.report().sample_count(), 2);
        assert!(source.origin().ends_with(&*file.path().file_name().unwrap().to_string_lossy()));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FixtureSource::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, GeneratorError::Io(_)));
    }

    #[test]
    fn test_malformed_fixture_is_invalid_report() {
        let err = FixtureSource::parse(r#"{"resource_usage": [{"executors": 3}]}"#, "bad").unwrap_err();
        match err {
            GeneratorError::InvalidReport(message) => assert!(message.starts_with("bad:")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_replay_in_order() {
        let source = FixtureSource::from_reader(FIXTURE.as_bytes(), "reader").unwrap();
        let mut seen = Vec::new();

        let mut consumer = |usage: &ResourceUsage| -> Result<()> {
            seen.push(usage.timestamp());
            Ok(())
        };
        let consumed = source.replay(&mut consumer).unwrap();

        assert_eq!(consumed, 2);
        assert_eq!(seen, vec![Some(11), Some(12)]);
    }

    #[test]
    fn test_replay_stops_on_consumer_error() {
        let source = FixtureSource::parse(FIXTURE, "inline").unwrap();
        let mut calls = 0;

        let mut consumer = |_: &ResourceUsage| -> Result<()> {
            calls += 1;
            Err(GeneratorError::InvalidReport("rejected".to_string()))
        };

        assert!(source.replay(&mut consumer).is_err());
        assert_eq!(calls, 1);
    }
}
