//! CLI subcommands

pub mod summary;
pub mod timeline;
pub mod validate;

use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use usage_lib::report::FixtureSource;

/// Load a report from a file, or from stdin when the path is `-`
pub fn load_report(path: &Path) -> Result<FixtureSource> {
    if path.as_os_str() == "-" {
        return FixtureSource::from_reader(io::stdin().lock(), "stdin")
            .context("Failed to read report from stdin");
    }
    FixtureSource::from_path(path)
        .with_context(|| format!("Failed to load report {}", path.display()))
}
