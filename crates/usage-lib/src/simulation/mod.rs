//! Time-stepped simulation of framework and executor resource usage
//!
//! A [`Session`] owns a fixed set of [`Framework`]s, each owning a fixed
//! set of [`Executor`]s. Every call to [`Session::sample`] advances the
//! simulated clock by one tick and captures a [`Sample`](crate::Sample)
//! of every executor's allocation and usage.

mod config;
mod executor;
mod framework;
mod load_curve;
mod sampler;
mod session;


pub use config::{
    AllocationRange, SessionConfig, DEFAULT_EXECUTORS_PER_FRAMEWORK, DEFAULT_FRAMEWORKS,
    DEFAULT_SAMPLES,
};
pub use executor::Executor;
pub use framework::Framework;
pub use load_curve::LoadCurve;
pub use session::{Session, SessionBuilder, TICK};
