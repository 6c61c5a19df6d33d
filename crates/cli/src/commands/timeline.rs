//! Per-sample timeline command

use anyhow::Result;
use std::path::Path;
use tabled::Tabled;
use usage_lib::report::{ResourceUsage, SampleTotals};

use super::load_report;
use crate::output::{format_bytes, format_secs, format_timestamp, print_info, print_json, print_table, OutputFormat};

/// Row for the timeline table
#[derive(Tabled)]
struct TimelineRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Executors")]
    executors: usize,
    #[tabled(rename = "CPUs")]
    cpus: u64,
    #[tabled(rename = "User Time")]
    user_time: String,
    #[tabled(rename = "RSS")]
    rss: String,
}

impl From<&SampleTotals> for TimelineRow {
    fn from(entry: &SampleTotals) -> Self {
        Self {
            time: entry
                .timestamp
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
            executors: entry.executors,
            cpus: entry.total_cpus,
            user_time: format_secs(entry.total_user_time_secs),
            rss: format_bytes(entry.total_rss_bytes),
        }
    }
}

/// Replay a report sample by sample and show the totals
pub fn show_timeline(path: &Path, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    let source = load_report(path)?;
    let limit = limit.unwrap_or(usize::MAX);

    let mut entries = Vec::new();
    let mut consume = |usage: &ResourceUsage| -> usage_lib::Result<()> {
        if entries.len() < limit {
            entries.push(SampleTotals::from_usage(usage));
        }
        Ok(())
    };
    let replayed = source.replay(&mut consume)?;

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Table => {
            let rows: Vec<TimelineRow> = entries.iter().map(TimelineRow::from).collect();
            print_table(&rows);
            if entries.len() < replayed {
                print_info(&format!("Showing {} of {} samples", entries.len(), replayed));
            }
        }
    }

    Ok(())
}
