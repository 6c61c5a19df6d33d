//! Structural checks on a usage report
//!
//! Verifies the properties downstream consumers rely on: consecutive
//! timestamps, a stable executor count, unique executors per sample and
//! statistics consistent with allocations.

use super::{ExecutorUsage, ResourceUsageReport};
use crate::models::MEM_LIMIT_SCALE;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// A single broken invariant, located by sample index and executor id
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("report contains no samples")]
    EmptyReport,

    #[error("sample {sample} has no executors")]
    EmptySample { sample: usize },

    #[error("sample {sample} has timestamp {timestamp}, expected {expected}")]
    NonConsecutiveTimestamp {
        sample: usize,
        expected: i64,
        timestamp: i64,
    },

    #[error("sample {sample}: executor {executor_id} has timestamp {found}, expected {expected}")]
    MixedTimestamps {
        sample: usize,
        executor_id: String,
        expected: i64,
        found: i64,
    },

    #[error("sample {sample} has {found} executors, expected {expected}")]
    ExecutorCountChanged {
        sample: usize,
        expected: usize,
        found: usize,
    },

    #[error("sample {sample}: executor {executor_id} appears more than once")]
    DuplicateExecutor { sample: usize, executor_id: String },

    #[error("sample {sample}: executor {executor_id} has no allocated {resource}")]
    MissingAllocation {
        sample: usize,
        executor_id: String,
        resource: String,
    },

    #[error("sample {sample}: executor {executor_id} has mem_limit_bytes {mem_limit_bytes}, expected {expected}")]
    MemLimitMismatch {
        sample: usize,
        executor_id: String,
        expected: u64,
        mem_limit_bytes: u64,
    },

    #[error("sample {sample}: executor {executor_id} has cpus_limit {cpus_limit}, expected {expected}")]
    CpusLimitMismatch {
        sample: usize,
        executor_id: String,
        expected: u64,
        cpus_limit: u32,
    },

    #[error("sample {sample}: executor {executor_id} has negative {field} ({value})")]
    NegativeTime {
        sample: usize,
        executor_id: String,
        field: String,
        value: f64,
    },
}

/// Outcome of [`validate_report`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub samples_checked: usize,
    pub executors_checked: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check every sample and executor; collects all violations rather than
/// stopping at the first
pub fn validate_report(report: &ResourceUsageReport) -> ValidationReport {
    let mut result = ValidationReport::default();

    if report.resource_usage.is_empty() {
        result.violations.push(Violation::EmptyReport);
        return result;
    }

    let expected_executors = report.resource_usage[0].executors.len();
    let mut previous_timestamp: Option<i64> = None;

    for (index, usage) in report.resource_usage.iter().enumerate() {
        result.samples_checked += 1;

        let Some(timestamp) = usage.timestamp() else {
            result.violations.push(Violation::EmptySample { sample: index });
            continue;
        };

        if let Some(previous) = previous_timestamp {
            if timestamp != previous + 1 {
                result.violations.push(Violation::NonConsecutiveTimestamp {
                    sample: index,
                    expected: previous + 1,
                    timestamp,
                });
            }
        }
        previous_timestamp = Some(timestamp);

        if usage.executors.len() != expected_executors {
            result.violations.push(Violation::ExecutorCountChanged {
                sample: index,
                expected: expected_executors,
                found: usage.executors.len(),
            });
        }

        let mut seen = HashSet::with_capacity(usage.executors.len());
        for executor in &usage.executors {
            result.executors_checked += 1;

            if !seen.insert(executor.executor_id()) {
                result.violations.push(Violation::DuplicateExecutor {
                    sample: index,
                    executor_id: executor.executor_id().to_string(),
                });
            }

            check_executor(index, timestamp, executor, &mut result.violations);
        }
    }

    result
}

fn check_executor(
    sample: usize,
    timestamp: i64,
    executor: &ExecutorUsage,
    violations: &mut Vec<Violation>,
) {
    let executor_id = executor.executor_id().to_string();
    let stats = &executor.statistics;

    if stats.timestamp != timestamp {
        violations.push(Violation::MixedTimestamps {
            sample,
            executor_id: executor_id.clone(),
            expected: timestamp,
            found: stats.timestamp,
        });
    }

    match executor.allocated_value("cpus") {
        Some(cpus) if cpus != u64::from(stats.cpus_limit) => {
            violations.push(Violation::CpusLimitMismatch {
                sample,
                executor_id: executor_id.clone(),
                expected: cpus,
                cpus_limit: stats.cpus_limit,
            });
        }
        Some(_) => {}
        None => violations.push(Violation::MissingAllocation {
            sample,
            executor_id: executor_id.clone(),
            resource: "cpus".to_string(),
        }),
    }

    match executor.allocated_value("mem") {
        Some(mem_mb) if mem_mb.saturating_mul(MEM_LIMIT_SCALE) != stats.mem_limit_bytes => {
            violations.push(Violation::MemLimitMismatch {
                sample,
                executor_id: executor_id.clone(),
                expected: mem_mb.saturating_mul(MEM_LIMIT_SCALE),
                mem_limit_bytes: stats.mem_limit_bytes,
            });
        }
        Some(_) => {}
        None => violations.push(Violation::MissingAllocation {
            sample,
            executor_id: executor_id.clone(),
            resource: "mem".to_string(),
        }),
    }

    for (field, value) in [
        ("cpus_user_time_secs", stats.cpus_user_time_secs),
        ("cpus_system_time_secs", stats.cpus_system_time_secs),
    ] {
        if value < 0.0 {
            violations.push(Violation::NegativeTime {
                sample,
                executor_id: executor_id.clone(),
                field: field.to_string(),
                value,
            });
        }
    }
}
