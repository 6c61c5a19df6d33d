//! Simulated executor
//!
//! An executor has a fixed allocation and reports usage through accessors
//! parameterized by timestamp. `user_time` is the only stateful accessor:
//! it tracks the last sampled time so it can divide by elapsed time.

use super::{AllocationRange, LoadCurve};
use crate::error::{GeneratorError, Result};
use crate::models::{Allocation, ExecutorId, FrameworkId};
use rand::Rng;

/// Largest divisor applied to allocated memory when drawing rss
const RSS_DIVISOR_MAX: u32 = 8;

/// A simulated workload unit with fixed allocation and time-varying usage
#[derive(Debug, Clone)]
pub struct Executor {
    id: ExecutorId,
    framework_id: FrameworkId,
    allocation: Allocation,
    load_curve: LoadCurve,
    last_sample_time: Option<i64>,
}

impl Executor {
    /// Create an executor with an explicit allocation and load curve
    pub fn new(
        id: ExecutorId,
        framework_id: FrameworkId,
        allocation: Allocation,
        load_curve: LoadCurve,
    ) -> Self {
        Self {
            id,
            framework_id,
            allocation,
            load_curve,
            last_sample_time: None,
        }
    }

    /// Create an executor with id, allocation and load curve drawn from `rng`
    pub fn random<R: Rng + ?Sized>(
        framework_id: FrameworkId,
        range: &AllocationRange,
        rng: &mut R,
    ) -> Self {
        let id = ExecutorId::random(rng);
        let allocation = Allocation {
            cpus: range.draw_cpus(rng),
            mem_mb: range.draw_mem_mb(rng),
        };
        let load_curve = LoadCurve::random(rng);

        Self::new(id, framework_id, allocation, load_curve)
    }

    pub fn id(&self) -> ExecutorId {
        self.id
    }

    pub fn framework_id(&self) -> FrameworkId {
        self.framework_id
    }

    pub fn load_curve(&self) -> &LoadCurve {
        &self.load_curve
    }

    /// Timestamp of the last `user_time` call, if any
    pub fn last_sample_time(&self) -> Option<i64> {
        self.last_sample_time
    }

    /// Allocated cpus; constant over the executor's life
    pub fn cpus_allocated(&self, _timestamp: i64) -> u32 {
        self.allocation.cpus
    }

    /// Allocated memory in MB; constant over the executor's life
    pub fn mem_allocated(&self, _timestamp: i64) -> u64 {
        self.allocation.mem_mb
    }

    /// Allocation at `timestamp`
    pub fn allocation(&self, timestamp: i64) -> Allocation {
        Allocation {
            cpus: self.cpus_allocated(timestamp),
            mem_mb: self.mem_allocated(timestamp),
        }
    }

    /// System time is not split out from user time
    pub fn system_time(&self, _timestamp: i64) -> f64 {
        0.0
    }

    /// User time since the previous call
    ///
    /// The first call records `timestamp` and returns 0. Later calls return
    /// `cpus * |load(timestamp)| / elapsed`. A timestamp that does not move
    /// past the previous one is rejected and leaves the state untouched.
    pub fn user_time(&mut self, timestamp: i64) -> Result<f64> {
        let Some(last) = self.last_sample_time else {
            self.last_sample_time = Some(timestamp);
            return Ok(0.0);
        };

        let delta = timestamp
            .checked_sub(last)
            .ok_or_else(|| GeneratorError::ElapsedOverflow {
                executor_id: self.id.to_string(),
                last,
                requested: timestamp,
            })?;
        if delta <= 0 {
            return Err(GeneratorError::NonIncreasingTimestamp {
                executor_id: self.id.to_string(),
                last,
                requested: timestamp,
            });
        }

        let load = self.load_curve.evaluate(timestamp as f64).abs();
        let time = f64::from(self.cpus_allocated(timestamp)) * load / delta as f64;

        self.last_sample_time = Some(timestamp);
        Ok(time)
    }

    /// Resident memory, allocated memory divided by a fresh draw from `1..=8`
    ///
    /// Memoryless: consecutive calls are independent of each other and of load.
    pub fn mem_rss_bytes<R: Rng + ?Sized>(&self, timestamp: i64, rng: &mut R) -> f64 {
        let divisor = rng.gen_range(1..=RSS_DIVISOR_MAX);
        self.allocation(timestamp).mem_limit_bytes() as f64 / f64::from(divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixed_executor(cpus: u32, mem_mb: u64, bias: f64) -> Executor {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        Executor::new(
            ExecutorId::random(&mut rng),
            FrameworkId::random(&mut rng),
            Allocation { cpus, mem_mb },
            LoadCurve::new(bias),
        )
    }

    #[test]
    fn test_allocation_constant_across_timestamps() {
        let executor = fixed_executor(3, 512, 0.5);

        for t in [0, 1, 1_000, -5, i64::MAX] {
            assert_eq!(executor.cpus_allocated(t), 3);
            assert_eq!(executor.mem_allocated(t), 512);
        }
    }

    #[test]
    fn test_system_time_is_zero() {
        let executor = fixed_executor(2, 100, 0.5);
        assert_eq!(executor.system_time(10), 0.0);
    }

    #[test]
    fn test_first_user_time_is_zero_and_seeds_cursor() {
        let mut executor = fixed_executor(2, 100, 0.5);
        assert!(executor.last_sample_time().is_none());

        assert_eq!(executor.user_time(1_000).unwrap(), 0.0);
        assert_eq!(executor.last_sample_time(), Some(1_000));
    }

    #[test]
    fn test_user_time_divides_by_elapsed() {
        let mut executor = fixed_executor(4, 100, 0.3);
        executor.user_time(100).unwrap();

        let time = executor.user_time(102).unwrap();
        let expected = 4.0 * LoadCurve::new(0.3).evaluate(102.0).abs() / 2.0;
        assert_relative_eq!(time, expected);
        assert_eq!(executor.last_sample_time(), Some(102));
    }

    #[test]
    fn test_repeated_timestamp_rejected() {
        let mut executor = fixed_executor(2, 100, 0.5);
        executor.user_time(50).unwrap();

        let err = executor.user_time(50).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::NonIncreasingTimestamp { last: 50, requested: 50, .. }
        ));
        assert_eq!(executor.last_sample_time(), Some(50));
    }

    #[test]
    fn test_earlier_timestamp_rejected() {
        let mut executor = fixed_executor(2, 100, 0.5);
        executor.user_time(50).unwrap();
        assert!(executor.user_time(49).is_err());

        // State is untouched, so the next valid tick still works
        assert!(executor.user_time(51).is_ok());
    }

    #[test]
    fn test_unrepresentable_elapsed_rejected() {
        let mut executor = fixed_executor(2, 100, 0.5);
        executor.user_time(i64::MIN).unwrap();

        let err = executor.user_time(i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::ElapsedOverflow { last: i64::MIN, requested: i64::MAX, .. }
        ));
        assert_eq!(executor.last_sample_time(), Some(i64::MIN));
    }

    #[test]
    fn test_user_time_uses_absolute_load() {
        // Zero bias lets the curve dip below zero
        let mut executor = fixed_executor(8, 100, 0.0);
        executor.user_time(0).unwrap();

        let mut saw_negative_load = false;
        for t in 1..500 {
            if executor.load_curve().evaluate(t as f64) < 0.0 {
                saw_negative_load = true;
            }
            assert!(executor.user_time(t).unwrap() >= 0.0);
        }
        assert!(saw_negative_load);
    }

    #[test]
    fn test_mem_rss_within_divisor_bounds() {
        let executor = fixed_executor(2, 100, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let full = 100.0 * 1024.0;

        for _ in 0..200 {
            let rss = executor.mem_rss_bytes(1, &mut rng);
            assert!(rss <= full);
            assert!(rss >= full / 8.0);
            // Divisor is an integer
            let divisor = full / rss;
            assert_relative_eq!(divisor, divisor.round(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_random_executor_respects_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let framework_id = FrameworkId::random(&mut rng);
        let range = AllocationRange::default();

        for _ in 0..50 {
            let executor = Executor::random(framework_id, &range, &mut rng);
            assert_eq!(executor.framework_id(), framework_id);
            assert!(range.cpus().contains(&executor.cpus_allocated(0)));
            assert!(range.mem_mb().contains(&executor.mem_allocated(0)));
        }
    }
}
