// SPDX-License-Identifier: PMPL-1.0-or-later

//! Lint report output: console, JSON/YAML and SARIF

pub mod formatter;
pub mod output;
pub mod sarif;

use crate::lint::LintReport;
use anyhow::Result;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Save lint reports to file, in the format implied by the extension
/// (JSON when there is none).
pub fn save_reports<P: AsRef<Path>>(reports: &[LintReport], path: P) -> Result<()> {
    let path = path.as_ref();
    let format = ReportOutputFormat::from_path(path).unwrap_or(ReportOutputFormat::Json);
    std::fs::write(path, format.serialize(reports)?)?;
    Ok(())
}

