//! Resource Usage CLI
//!
//! A command-line tool for summarizing, browsing and validating
//! executor resource usage reports.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{summary, timeline, validate};
use std::path::PathBuf;

/// Resource Usage CLI
#[derive(Parser)]
#[command(name = "usage")]
#[command(author, version, about = "CLI for executor resource usage reports", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize each executor in a report
    Summary {
        /// Report file ("-" reads stdin)
        report: PathBuf,
    },

    /// Show per-sample totals over time
    Timeline {
        /// Report file ("-" reads stdin)
        report: PathBuf,

        /// Show only the first N samples
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Check a report for structural problems
    Validate {
        /// Report file ("-" reads stdin)
        report: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { report } => {
            summary::show_summary(&report, cli.format)?;
        }
        Commands::Timeline { report, limit } => {
            timeline::show_timeline(&report, limit, cli.format)?;
        }
        Commands::Validate { report } => {
            if !validate::validate(&report, cli.format)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
