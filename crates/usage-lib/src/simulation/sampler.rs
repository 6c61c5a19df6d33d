//! Point-in-time capture of every executor in a set of frameworks

use super::{Executor, Framework};
use crate::error::Result;
use crate::models::{ExecutorSnapshot, Sample, Usage};
use rand::Rng;

impl ExecutorSnapshot {
    /// Capture `executor` at `timestamp`, advancing its user time cursor
    pub fn capture<R: Rng + ?Sized>(
        executor: &mut Executor,
        timestamp: i64,
        rng: &mut R,
    ) -> Result<Self> {
        let allocation = executor.allocation(timestamp);
        let system_time_secs = executor.system_time(timestamp);
        let user_time_secs = executor.user_time(timestamp)?;
        let mem_rss_bytes = executor.mem_rss_bytes(timestamp, rng);

        Ok(Self {
            executor_id: executor.id(),
            framework_id: executor.framework_id(),
            allocation,
            usage: Usage {
                system_time_secs,
                user_time_secs,
                mem_rss_bytes,
            },
        })
    }
}

impl Sample {
    /// Capture all executors, in framework then executor order, at `timestamp`
    pub fn capture<R: Rng + ?Sized>(
        timestamp: i64,
        frameworks: &mut [Framework],
        rng: &mut R,
    ) -> Result<Self> {
        let capacity = frameworks.iter().map(Framework::executor_count).sum();
        let mut executor_snapshots = Vec::with_capacity(capacity);

        for framework in frameworks.iter_mut() {
            for executor in framework.executors_mut() {
                executor_snapshots.push(ExecutorSnapshot::capture(executor, timestamp, rng)?);
            }
        }

        Ok(Self {
            timestamp,
            executor_snapshots,
        })
    }
}
