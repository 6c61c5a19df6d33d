//! Aggregate statistics over a usage report

use super::{ExecutorUsage, ResourceUsage, ResourceUsageReport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-executor aggregates across every sample the executor appears in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSummary {
    pub executor_id: String,
    pub framework_id: String,
    pub cpus: u32,
    pub mem_limit_bytes: u64,
    pub samples: usize,
    pub mean_user_time_secs: f64,
    pub max_user_time_secs: f64,
    /// Mean of `user_time / cpus_limit`
    pub mean_utilization: f64,
    pub mean_rss_bytes: f64,
    pub max_rss_bytes: f64,
}

/// Totals across all executors at one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTotals {
    pub timestamp: Option<i64>,
    pub executors: usize,
    pub total_cpus: u64,
    pub total_user_time_secs: f64,
    pub total_rss_bytes: f64,
}

impl SampleTotals {
    /// Sum one sample's executors
    pub fn from_usage(usage: &ResourceUsage) -> Self {
        let mut totals = Self {
            timestamp: usage.timestamp(),
            executors: usage.executors.len(),
            total_cpus: 0,
            total_user_time_secs: 0.0,
            total_rss_bytes: 0.0,
        };
        for executor in &usage.executors {
            totals.total_cpus += u64::from(executor.statistics.cpus_limit);
            totals.total_user_time_secs += executor.statistics.cpus_user_time_secs;
            totals.total_rss_bytes += executor.statistics.mem_rss_bytes;
        }
        totals
    }
}

/// Summary of a whole report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub samples: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    /// Executors in the order they first appear
    pub executors: Vec<ExecutorSummary>,
    pub timeline: Vec<SampleTotals>,
}

/// Running sums for one executor
#[derive(Default)]
struct Accumulator {
    samples: usize,
    user_time_sum: f64,
    user_time_max: f64,
    utilization_sum: f64,
    rss_sum: f64,
    rss_max: f64,
}

impl Accumulator {
    fn add(&mut self, executor: &ExecutorUsage) {
        let stats = &executor.statistics;
        self.samples += 1;
        self.user_time_sum += stats.cpus_user_time_secs;
        self.user_time_max = self.user_time_max.max(stats.cpus_user_time_secs);
        if stats.cpus_limit > 0 {
            self.utilization_sum += stats.cpus_user_time_secs / f64::from(stats.cpus_limit);
        }
        self.rss_sum += stats.mem_rss_bytes;
        self.rss_max = self.rss_max.max(stats.mem_rss_bytes);
    }

    fn mean(&self, sum: f64) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            sum / self.samples as f64
        }
    }
}

/// Summarize a report per executor and per sample
pub fn summarize(report: &ResourceUsageReport) -> ReportSummary {
    let mut order: Vec<&ExecutorUsage> = Vec::new();
    let mut accumulators: Vec<Accumulator> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut timeline = Vec::with_capacity(report.sample_count());

    for usage in &report.resource_usage {
        for executor in &usage.executors {
            let position = *index.entry(executor.executor_id()).or_insert_with(|| {
                order.push(executor);
                accumulators.push(Accumulator::default());
                accumulators.len() - 1
            });
            accumulators[position].add(executor);
        }

        timeline.push(SampleTotals::from_usage(usage));
    }

    let executors = order
        .iter()
        .zip(&accumulators)
        .map(|(first, acc)| ExecutorSummary {
            executor_id: first.executor_id().to_string(),
            framework_id: first.framework_id().to_string(),
            cpus: first.statistics.cpus_limit,
            mem_limit_bytes: first.statistics.mem_limit_bytes,
            samples: acc.samples,
            mean_user_time_secs: acc.mean(acc.user_time_sum),
            max_user_time_secs: acc.user_time_max,
            mean_utilization: acc.mean(acc.utilization_sum),
            mean_rss_bytes: acc.mean(acc.rss_sum),
            max_rss_bytes: acc.rss_max,
        })
        .collect();

    ReportSummary {
        samples: report.sample_count(),
        first_timestamp: timeline.iter().find_map(|t| t.timestamp),
        last_timestamp: timeline.iter().rev().find_map(|t| t.timestamp),
        executors,
        timeline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{AllocationRange, Session};
    use approx::assert_relative_eq;

    #[test]
    fn test_summary_of_generated_report() {
        let mut session = Session::builder()
            .frameworks(3)
            .executors_per_framework(2)
            .samples(10)
            .seed(17)
            .start_time(0)
            .build()
            .unwrap();
        let samples = session.generate().unwrap();
        let report = ResourceUsageReport::from_samples(&samples);

        let summary = summarize(&report);

        assert_eq!(summary.samples, 10);
        assert_eq!(summary.first_timestamp, Some(1));
        assert_eq!(summary.last_timestamp, Some(10));
        assert_eq!(summary.executors.len(), 6);
        assert_eq!(summary.timeline.len(), 10);
        assert!(summary.executors.iter().all(|e| e.samples == 10));

        // First-seen order matches snapshot order
        let ids: Vec<_> = samples[0]
            .executor_snapshots
            .iter()
            .map(|s| s.executor_id.to_string())
            .collect();
        let summary_ids: Vec<_> = summary.executors.iter().map(|e| e.executor_id.clone()).collect();
        assert_eq!(summary_ids, ids);
    }

    #[test]
    fn test_summary_means() {
        let mut session = Session::builder()
            .frameworks(1)
            .executors_per_framework(1)
            .samples(4)
            .allocation(AllocationRange::fixed(2, 100))
            .seed(3)
            .start_time(100)
            .build()
            .unwrap();
        let samples = session.generate().unwrap();
        let report = ResourceUsageReport::from_samples(&samples);

        let summary = summarize(&report);
        let executor = &summary.executors[0];

        let user_times: Vec<f64> = samples
            .iter()
            .map(|s| s.executor_snapshots[0].usage.user_time_secs)
            .collect();
        let mean = user_times.iter().sum::<f64>() / 4.0;

        assert_eq!(executor.cpus, 2);
        assert_eq!(executor.mem_limit_bytes, 102_400);
        assert_relative_eq!(executor.mean_user_time_secs, mean);
        assert_relative_eq!(executor.mean_utilization, mean / 2.0, epsilon = 1e-12);
        assert_relative_eq!(
            executor.max_user_time_secs,
            user_times.iter().cloned().fold(0.0, f64::max)
        );
        assert!(executor.max_rss_bytes <= 102_400.0);
        assert!(executor.mean_rss_bytes >= 102_400.0 / 8.0);
    }

    #[test]
    fn test_timeline_totals_match_snapshots() {
        let mut session = Session::builder()
            .frameworks(2)
            .executors_per_framework(2)
            .samples(5)
            .seed(21)
            .start_time(0)
            .build()
            .unwrap();
        let samples = session.generate().unwrap();
        let report = ResourceUsageReport::from_samples(&samples);

        let summary = summarize(&report);

        for (sample, totals) in samples.iter().zip(&summary.timeline) {
            assert_eq!(totals.timestamp, Some(sample.timestamp));
            assert_eq!(totals.executors, 4);
            assert_eq!(
                totals.total_cpus,
                sample
                    .executor_snapshots
                    .iter()
                    .map(|s| u64::from(s.allocation.cpus))
                    .sum::<u64>()
            );
            assert_relative_eq!(
                totals.total_user_time_secs,
                sample
                    .executor_snapshots
                    .iter()
                    .map(|s| s.usage.user_time_secs)
                    .sum::<f64>()
            );
        }
        assert_eq!(
            summary.timeline[0],
            SampleTotals::from_usage(&report.resource_usage[0])
        );
    }

    #[test]
    fn test_summary_of_empty_report() {
        let summary = summarize(&ResourceUsageReport::default());
        assert_eq!(summary.samples, 0);
        assert!(summary.first_timestamp.is_none());
        assert!(summary.executors.is_empty());
    }
}
