//! Report validation command

use anyhow::Result;
use std::path::Path;
use usage_lib::report::validate_report;

use super::load_report;
use crate::output::{print_error, print_json, print_success, OutputFormat};

/// Validate a report; returns whether it passed
pub fn validate(path: &Path, format: OutputFormat) -> Result<bool> {
    let source = load_report(path)?;
    let result = validate_report(source.report());

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            if result.is_valid() {
                print_success(&format!(
                    "{}: {} samples, {} executor entries, no problems found",
                    source.origin(),
                    result.samples_checked,
                    result.executors_checked
                ));
            } else {
                for violation in &result.violations {
                    print_error(&violation.to_string());
                }
                print_error(&format!(
                    "{}: {} problem(s) in {} samples",
                    source.origin(),
                    result.violations.len(),
                    result.samples_checked
                ));
            }
        }
    }

    Ok(result.is_valid())
}
