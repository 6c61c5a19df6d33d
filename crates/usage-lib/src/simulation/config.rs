//! Session configuration and validation

use super::TICK;
use crate::error::{GeneratorError, Result};
use crate::models::MAX_MEM_MB;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Default number of simulated frameworks
pub const DEFAULT_FRAMEWORKS: usize = 4;

/// Default number of executors owned by each framework
pub const DEFAULT_EXECUTORS_PER_FRAMEWORK: usize = 2;

/// Default number of samples in a generated report
pub const DEFAULT_SAMPLES: usize = 1000;

/// Inclusive bounds for the allocation drawn for each new executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRange {
    pub cpus_min: u32,
    pub cpus_max: u32,
    pub mem_min_mb: u64,
    pub mem_max_mb: u64,
}

impl Default for AllocationRange {
    fn default() -> Self {
        Self {
            cpus_min: 1,
            cpus_max: 8,
            mem_min_mb: 32,
            mem_max_mb: 4096,
        }
    }
}

impl AllocationRange {
    /// A range that always yields exactly the given allocation
    pub fn fixed(cpus: u32, mem_mb: u64) -> Self {
        Self {
            cpus_min: cpus,
            cpus_max: cpus,
            mem_min_mb: mem_mb,
            mem_max_mb: mem_mb,
        }
    }

    pub fn cpus(&self) -> RangeInclusive<u32> {
        self.cpus_min..=self.cpus_max
    }

    pub fn mem_mb(&self) -> RangeInclusive<u64> {
        self.mem_min_mb..=self.mem_max_mb
    }

    /// Draw a cpu count from the range
    pub fn draw_cpus<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.cpus())
    }

    /// Draw a memory size in MB from the range
    pub fn draw_mem_mb<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.mem_mb())
    }

    pub fn validate(&self) -> Result<()> {
        if self.cpus_min == 0 {
            return Err(GeneratorError::invalid_config("cpus_min", "must be positive"));
        }
        if self.cpus_min > self.cpus_max {
            return Err(GeneratorError::invalid_config(
                "cpus_max",
                format!("{} is below cpus_min {}", self.cpus_max, self.cpus_min),
            ));
        }
        if self.mem_min_mb == 0 {
            return Err(GeneratorError::invalid_config("mem_min_mb", "must be positive"));
        }
        if self.mem_min_mb > self.mem_max_mb {
            return Err(GeneratorError::invalid_config(
                "mem_max_mb",
                format!("{} is below mem_min_mb {}", self.mem_max_mb, self.mem_min_mb),
            ));
        }
        if self.mem_max_mb > MAX_MEM_MB {
            return Err(GeneratorError::invalid_config(
                "mem_max_mb",
                format!("{} exceeds the largest reportable {}", self.mem_max_mb, MAX_MEM_MB),
            ));
        }
        Ok(())
    }
}

/// Parameters of a generation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of frameworks, fixed for the life of the session
    pub frameworks: usize,
    /// Number of executors created by each framework
    pub executors_per_framework: usize,
    /// Number of samples produced by [`Session::generate`](super::Session::generate)
    pub samples: usize,
    /// Allocation bounds for new executors
    pub allocation: AllocationRange,
    /// Seed for the session's random generator; drawn from entropy when unset
    pub seed: Option<u64>,
    /// Initial clock value; the current epoch second when unset
    pub start_time: Option<i64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frameworks: DEFAULT_FRAMEWORKS,
            executors_per_framework: DEFAULT_EXECUTORS_PER_FRAMEWORK,
            samples: DEFAULT_SAMPLES,
            allocation: AllocationRange::default(),
            seed: None,
            start_time: None,
        }
    }
}

impl SessionConfig {
    /// Reject counts and ranges that would yield an empty or malformed report
    pub fn validate(&self) -> Result<()> {
        if self.frameworks == 0 {
            return Err(GeneratorError::invalid_config("frameworks", "must be positive"));
        }
        if self.executors_per_framework == 0 {
            return Err(GeneratorError::invalid_config(
                "executors_per_framework",
                "must be positive",
            ));
        }
        if self.samples == 0 {
            return Err(GeneratorError::invalid_config("samples", "must be positive"));
        }
        if let Some(start_time) = self.start_time {
            let last = i64::try_from(self.samples)
                .ok()
                .and_then(|samples| samples.checked_mul(TICK))
                .and_then(|span| start_time.checked_add(span));
            if last.is_none() {
                return Err(GeneratorError::invalid_config(
                    "start_time",
                    format!("{} leaves no room for {} samples", start_time, self.samples),
                ));
            }
        }
        self.allocation.validate()
    }

    /// Total executors across all frameworks
    pub fn total_executors(&self) -> usize {
        self.frameworks * self.executors_per_framework
    }
}
