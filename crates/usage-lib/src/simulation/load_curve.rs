//! Per-executor load curve
//!
//! Produces a pseudo-periodic load fraction from simulated time by averaging
//! two sinusoids offset by a bias drawn once when the executor is created.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pseudo-periodic load fraction as a function of simulated time
///
/// Values are roughly in `[0, 1]` but not clamped: the sinusoids can push
/// the result slightly outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadCurve {
    bias: f64,
}

impl LoadCurve {
    /// Create a curve with a fixed bias
    pub fn new(bias: f64) -> Self {
        Self { bias }
    }

    /// Create a curve with a bias drawn uniformly from `[0, 1)`
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen::<f64>())
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Load fraction at simulated time `t`
    pub fn evaluate(&self, t: f64) -> f64 {
        let fast = (self.bias + t.sin()) / 2.0;
        let slow = (self.bias + (t / 2.0).sin()) / 2.0;
        (fast + slow) / 2.0
    }
}
