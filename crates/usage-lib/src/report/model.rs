//! Report tree and the mapping from samples into it

use crate::models::{ExecutorSnapshot, Sample};
use serde::{Deserialize, Serialize};

/// Role attached to every allocated resource
pub const DEFAULT_ROLE: &str = "*";

/// Top-level report: one entry per sample, in sample order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsageReport {
    pub resource_usage: Vec<ResourceUsage>,
}

/// All executors observed at one sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub executors: Vec<ExecutorUsage>,
}

/// One executor's allocation, identity and statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorUsage {
    pub allocated: Vec<Resource>,
    pub executor_info: ExecutorInfo,
    pub statistics: ResourceStatistics,
}

/// A named scalar resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub role: String,
    pub scalar: Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scalar {
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorInfo {
    pub executor_id: IdValue,
    pub framework_id: IdValue,
}

/// Identifier wrapped in a `{"value": ...}` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdValue {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStatistics {
    pub cpus_limit: u32,
    pub cpus_system_time_secs: f64,
    pub cpus_user_time_secs: f64,
    pub mem_limit_bytes: u64,
    pub mem_rss_bytes: f64,
    pub timestamp: i64,
}

impl Resource {
    pub fn scalar(name: &str, value: u64) -> Self {
        Self {
            name: name.to_string(),
            role: DEFAULT_ROLE.to_string(),
            scalar: Scalar { value },
        }
    }
}

impl ExecutorUsage {
    /// Map a snapshot taken at `timestamp` into its report entry
    pub fn from_snapshot(snapshot: &ExecutorSnapshot, timestamp: i64) -> Self {
        let allocation = snapshot.allocation;

        Self {
            allocated: vec![
                Resource::scalar("cpus", u64::from(allocation.cpus)),
                Resource::scalar("mem", allocation.mem_mb),
            ],
            executor_info: ExecutorInfo {
                executor_id: IdValue {
                    value: snapshot.executor_id.to_string(),
                },
                framework_id: IdValue {
                    value: snapshot.framework_id.to_string(),
                },
            },
            statistics: ResourceStatistics {
                cpus_limit: allocation.cpus,
                cpus_system_time_secs: snapshot.usage.system_time_secs,
                cpus_user_time_secs: snapshot.usage.user_time_secs,
                mem_limit_bytes: allocation.mem_limit_bytes(),
                mem_rss_bytes: snapshot.usage.mem_rss_bytes,
                timestamp,
            },
        }
    }

    /// Value of the allocated resource called `name`
    pub fn allocated_value(&self, name: &str) -> Option<u64> {
        self.allocated
            .iter()
            .find(|resource| resource.name == name)
            .map(|resource| resource.scalar.value)
    }

    pub fn executor_id(&self) -> &str {
        &self.executor_info.executor_id.value
    }

    pub fn framework_id(&self) -> &str {
        &self.executor_info.framework_id.value
    }
}

impl ResourceUsage {
    pub fn from_sample(sample: &Sample) -> Self {
        Self {
            executors: sample
                .executor_snapshots
                .iter()
                .map(|snapshot| ExecutorUsage::from_snapshot(snapshot, sample.timestamp))
                .collect(),
        }
    }

    /// Timestamp of the first executor, which every executor shares
    pub fn timestamp(&self) -> Option<i64> {
        self.executors.first().map(|e| e.statistics.timestamp)
    }
}

impl ResourceUsageReport {
    /// Shape samples into the report tree, preserving sample order
    pub fn from_samples(samples: &[Sample]) -> Self {
        Self {
            resource_usage: samples.iter().map(ResourceUsage::from_sample).collect(),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.resource_usage.len()
    }

    /// Executor count of each sample, in order
    pub fn executor_counts(&self) -> Vec<usize> {
        self.resource_usage
            .iter()
            .map(|usage| usage.executors.len())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, ExecutorId, FrameworkId, Usage};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn snapshot() -> ExecutorSnapshot {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        ExecutorSnapshot {
            executor_id: ExecutorId::random(&mut rng),
            framework_id: FrameworkId::random(&mut rng),
            allocation: Allocation { cpus: 2, mem_mb: 100 },
            usage: Usage {
                system_time_secs: 0.0,
                user_time_secs: 0.75,
                mem_rss_bytes: 25_600.0,
            },
        }
    }

    #[test]
    fn test_snapshot_field_mapping() {
        let snapshot = snapshot();
        let usage = ExecutorUsage::from_snapshot(&snapshot, 1_000);

        assert_eq!(usage.allocated_value("cpus"), Some(2));
        assert_eq!(usage.allocated_value("mem"), Some(100));
        assert!(usage.allocated.iter().all(|r| r.role == DEFAULT_ROLE));
        assert_eq!(usage.executor_id(), snapshot.executor_id.to_string());
        assert_eq!(usage.framework_id(), snapshot.framework_id.to_string());

        let stats = &usage.statistics;
        assert_eq!(stats.cpus_limit, 2);
        assert_eq!(stats.cpus_system_time_secs, 0.0);
        assert_eq!(stats.cpus_user_time_secs, 0.75);
        assert_eq!(stats.mem_limit_bytes, 102_400);
        assert_eq!(stats.mem_rss_bytes, 25_600.0);
        assert_eq!(stats.timestamp, 1_000);
    }

    #[test]
    fn test_serialized_layout() {
        let sample = Sample {
            timestamp: 7,
            executor_snapshots: vec![snapshot()],
        };
        let report = ResourceUsageReport::from_samples(&[sample]);
        let value = serde_json::to_value(&report).unwrap();

        let executor = &value["resource_usage"][0]["executors"][0];
        assert_eq!(executor["allocated"][0]["name"], "cpus");
        assert_eq!(executor["allocated"][0]["role"], "*");
        assert_eq!(executor["allocated"][0]["scalar"]["value"], 2);
        assert_eq!(executor["allocated"][1]["name"], "mem");
        assert_eq!(executor["allocated"][1]["scalar"]["value"], 100);
        assert!(executor["executor_info"]["executor_id"]["value"].is_string());
        assert!(executor["executor_info"]["framework_id"]["value"].is_string());
        assert_eq!(executor["statistics"]["cpus_limit"], 2);
        assert_eq!(executor["statistics"]["mem_limit_bytes"], 102_400);
        assert_eq!(executor["statistics"]["timestamp"], 7);
        assert!(executor["statistics"]["cpus_user_time_secs"].is_f64());
    }

    #[test]
    fn test_empty_report() {
        let report = ResourceUsageReport::from_samples(&[]);
        assert_eq!(report.sample_count(), 0);
        assert!(report.executor_counts().is_empty());
    }
}
