//! Rendering of the report tree to JSON

use super::ResourceUsageReport;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON layout of a rendered report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Indented, one field per line (default)
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Serializes a [`ResourceUsageReport`] in the chosen format
#[derive(Debug, Clone, Default)]
pub struct ReportWriter {
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Render the report to bytes, terminated by a newline
    pub fn render(&self, report: &ResourceUsageReport) -> Result<Vec<u8>> {
        let mut bytes = match self.format {
            ReportFormat::Pretty => serde_json::to_vec_pretty(report)?,
            ReportFormat::Compact => serde_json::to_vec(report)?,
        };
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Render the report to a string
    pub fn render_string(&self, report: &ResourceUsageReport) -> Result<String> {
        let bytes = self.render(report)?;
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the report to `writer` and flush it; returns bytes written
    pub fn write<W: Write>(&self, report: &ResourceUsageReport, mut writer: W) -> Result<usize> {
        let bytes = self.render(report)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(bytes.len())
    }
}
