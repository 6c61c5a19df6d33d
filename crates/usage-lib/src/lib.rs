//! Library for synthesizing executor resource usage telemetry
//!
//! This crate provides the core functionality for:
//! - Simulating frameworks and executors with per-executor load curves
//! - Capturing point-in-time samples of allocation and usage
//! - Shaping samples into the nested resource usage report
//! - Reading, validating and summarizing rendered reports
//! - Structured logging and metrics for generator runs

pub mod error;
pub mod models;
pub mod observability;
pub mod report;
pub mod simulation;

pub use error::{GeneratorError, Result};
pub use models::*;
pub use observability::{GeneratorMetrics, StructuredLogger};
