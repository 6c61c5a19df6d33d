//! Core data models for the usage generator

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Build a version 4 UUID from the given generator so ids follow the seed
fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Unique identifier of a simulated framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameworkId(Uuid);

impl FrameworkId {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(random_uuid(rng))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FrameworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of a simulated executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutorId(Uuid);

impl ExecutorId {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(random_uuid(rng))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ExecutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Resources allocated to an executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub cpus: u32,
    pub mem_mb: u64,
}

/// Factor from allocated memory to the reported memory limit
pub const MEM_LIMIT_SCALE: u64 = 1024;

/// Largest allocated memory whose reported limit fits in a `u64`
pub const MAX_MEM_MB: u64 = u64::MAX / MEM_LIMIT_SCALE;

impl Allocation {
    /// Memory limit as reported in statistics (`mem_mb * 1024`)
    ///
    /// Saturates above [`MAX_MEM_MB`], which validated ranges never reach.
    pub fn mem_limit_bytes(&self) -> u64 {
        self.mem_mb.saturating_mul(MEM_LIMIT_SCALE)
    }
}

/// Resources used by an executor at one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub system_time_secs: f64,
    pub user_time_secs: f64,
    pub mem_rss_bytes: f64,
}

/// Point-in-time capture of one executor's allocation and usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSnapshot {
    pub executor_id: ExecutorId,
    pub framework_id: FrameworkId,
    pub allocation: Allocation,
    pub usage: Usage,
}

/// All executor snapshots taken at one tick of the simulated clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: i64,
    pub executor_snapshots: Vec<ExecutorSnapshot>,
}

impl Sample {
    /// Number of executors captured in this sample
    pub fn executor_count(&self) -> usize {
        self.executor_snapshots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ids_follow_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(ExecutorId::random(&mut a), ExecutorId::random(&mut b));
        assert_eq!(FrameworkId::random(&mut a), FrameworkId::random(&mut b));
    }

    #[test]
    fn test_ids_are_v4_uuids() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = ExecutorId::random(&mut rng);

        assert_eq!(id.as_uuid().get_version_num(), 4);
        assert_eq!(id.to_string().len(), 36);
    }

    #[test]
    fn test_mem_limit_bytes() {
        let allocation = Allocation { cpus: 2, mem_mb: 100 };
        assert_eq!(allocation.mem_limit_bytes(), 102_400);
    }

    #[test]
    fn test_mem_limit_bytes_at_bounds() {
        let largest = Allocation { cpus: 1, mem_mb: MAX_MEM_MB };
        assert_eq!(largest.mem_limit_bytes(), MAX_MEM_MB * MEM_LIMIT_SCALE);

        let beyond = Allocation { cpus: 1, mem_mb: u64::MAX };
        assert_eq!(beyond.mem_limit_bytes(), u64::MAX);
    }
}
