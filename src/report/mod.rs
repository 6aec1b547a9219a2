// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Report struct and the output generator invoked once per audit.

mod console;
mod totals;
mod validate;

pub use console::summarize_report;
pub use validate::validate_results;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::image::ProcessedImage;
use totals::ReportTotals;

/// Overall outcome of an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// No unsigned RPMs.
    Success,
    /// Unsigned RPMs found, but the run is not configured to fail on them.
    Warning,
    /// Unsigned RPMs found and the run fails on them.
    Failure,
}

impl Verdict {
    #[must_use]
    pub fn new(results: &[ProcessedImage], fail_unsigned: bool) -> Self {
        match (results.iter().any(ProcessedImage::has_unsigned), fail_unsigned) {
            (false, _) => Self::Success,
            (true, false) => Self::Warning,
            (true, true) => Self::Failure,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Failure => "FAILURE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    result: Verdict,
    fail_unsigned: bool,
    totals: ReportTotals,
    images: &'a [ProcessedImage],
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(images: &'a [ProcessedImage], fail_unsigned: bool) -> Self {
        Self {
            result: Verdict::new(images, fail_unsigned),
            fail_unsigned,
            totals: ReportTotals::calculate(images),
            images,
        }
    }
}

/// Turns the collected results of an audit into a report.
#[cfg_attr(test, mockall::automock)]
pub trait OutputGenerator {
    /// Generate the report for `results`. Called exactly once per audit.
    ///
    /// # Errors
    /// Returns an error if the report cannot be written.
    fn generate(&self, results: &[ProcessedImage], fail_unsigned: bool) -> Result<()>;
}

/// Prints a console summary and optionally writes the report as JSON.
#[derive(Debug, Default)]
pub struct ReportGenerator {
    report_path: Option<PathBuf>,
}

impl ReportGenerator {
    #[must_use]
    pub fn new(report_path: Option<PathBuf>) -> Self {
        Self { report_path }
    }
}

impl OutputGenerator for ReportGenerator {
    fn generate(&self, results: &[ProcessedImage], fail_unsigned: bool) -> Result<()> {
        let report = Report::new(results, fail_unsigned);
        if let Some(dest) = &self.report_path {
            write_report_to_file(&report, dest)?;
        }
        summarize_report(&report);
        Ok(())
    }
}

/// Write the report to a file.
///
/// # Errors
/// Returns an error if the report cannot be serialized to JSON or if the file cannot be created.
fn write_report_to_file(report: &Report<'_>, dest: &Path) -> Result<()> {
    info!(file = %dest.display(), "Writing report to file");
    let file = File::create(dest)
        .with_context(|| format!("Failed to create JSON output file: {}", dest.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("Failed to serialize report to JSON: {}", dest.display()))?;
    Ok(())
}
