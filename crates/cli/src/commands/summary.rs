//! Report summary command

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tabled::Tabled;
use usage_lib::report::{summarize, ExecutorSummary};

use super::load_report;
use crate::output::{
    color_utilization, format_bytes, format_secs, format_timestamp, print_json, print_table,
    print_warning, short_id, OutputFormat,
};

/// Row for the executor summary table
#[derive(Tabled)]
struct ExecutorRow {
    #[tabled(rename = "Executor")]
    executor: String,
    #[tabled(rename = "Framework")]
    framework: String,
    #[tabled(rename = "CPUs")]
    cpus: u32,
    #[tabled(rename = "Mem Limit")]
    mem_limit: String,
    #[tabled(rename = "Mean User")]
    mean_user: String,
    #[tabled(rename = "Max User")]
    max_user: String,
    #[tabled(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "Mean RSS")]
    mean_rss: String,
}

impl From<&ExecutorSummary> for ExecutorRow {
    fn from(e: &ExecutorSummary) -> Self {
        Self {
            executor: short_id(&e.executor_id),
            framework: short_id(&e.framework_id),
            cpus: e.cpus,
            mem_limit: format_bytes(e.mem_limit_bytes as f64),
            mean_user: format_secs(e.mean_user_time_secs),
            max_user: format_secs(e.max_user_time_secs),
            utilization: color_utilization(e.mean_utilization),
            mean_rss: format_bytes(e.mean_rss_bytes),
        }
    }
}

/// Show per-executor aggregates for a report
pub fn show_summary(path: &Path, format: OutputFormat) -> Result<()> {
    let source = load_report(path)?;
    let summary = summarize(source.report());

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            println!("{}", "Usage Report Summary".bold());
            println!("{}", "=".repeat(50));
            println!("Source:                 {}", source.origin().cyan());
            println!("Samples:                {}", summary.samples);
            println!("Executors:              {}", summary.executors.len());
            if let (Some(first), Some(last)) = (summary.first_timestamp, summary.last_timestamp) {
                println!("First sample:           {}", format_timestamp(first));
                println!("Last sample:            {}", format_timestamp(last));
            }
            println!();

            if summary.samples == 0 {
                print_warning("Report contains no samples");
                return Ok(());
            }

            let rows: Vec<ExecutorRow> = summary.executors.iter().map(ExecutorRow::from).collect();
            print_table(&rows);
        }
    }

    Ok(())
}
