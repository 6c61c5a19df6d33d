//! Simulated framework owning a fixed set of executors

use super::{AllocationRange, Executor};
use crate::models::FrameworkId;
use rand::Rng;

/// A simulated tenant; its executors never change after construction
#[derive(Debug, Clone)]
pub struct Framework {
    id: FrameworkId,
    executors: Vec<Executor>,
}

impl Framework {
    /// Create a framework with `executor_count` randomly allocated executors
    pub fn new<R: Rng + ?Sized>(executor_count: usize, range: &AllocationRange, rng: &mut R) -> Self {
        let id = FrameworkId::random(rng);
        let executors = (0..executor_count)
            .map(|_| Executor::random(id, range, rng))
            .collect();

        Self { id, executors }
    }

    pub fn id(&self) -> FrameworkId {
        self.id
    }

    pub fn executors(&self) -> &[Executor] {
        &self.executors
    }

    /// Mutable access for sampling; the slice length cannot change
    pub(crate) fn executors_mut(&mut self) -> &mut [Executor] {
        &mut self.executors
    }

    pub fn executor_count(&self) -> usize {
        self.executors.len()
    }
}
