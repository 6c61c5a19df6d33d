//! Resource usage report
//!
//! The report is a plain serde tree mirroring the fixture layout consumed
//! by downstream filters: a `resource_usage` array of samples, each with an
//! `executors` array carrying allocation, identity and statistics. Samples
//! are shaped into the tree by [`ResourceUsageReport::from_samples`] and
//! rendered by a [`ReportWriter`]. The [`FixtureSource`] reads rendered
//! reports back for replay, validation and summaries.

mod model;
mod source;
mod summary;
mod validate;
mod writer;

pub use model::{
    ExecutorInfo, ExecutorUsage, IdValue, Resource, ResourceStatistics, ResourceUsage,
    ResourceUsageReport, Scalar, DEFAULT_ROLE,
};
pub use source::{FixtureSource, UsageConsumer};
pub use summary::{summarize, ExecutorSummary, ReportSummary, SampleTotals};
pub use validate::{validate_report, ValidationReport, Violation};
pub use writer::{ReportFormat, ReportWriter};
