// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
mod args;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::Args;
use rpm_verifier::audit::run_audit;
use rpm_verifier::image::ImageProcessor;
use rpm_verifier::report::{validate_results, ReportGenerator};
use rpm_verifier::rpmdb::{OcImageExtractor, RpmQueryInspector};
use rpm_verifier::Config;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    let config = args
        .into_config()
        .validate()
        .context("Invalid configuration")?;
    let (workdir, scratch) = create_workdir(&config)?;
    info!(
        images = config.images.len(),
        workdir = %workdir.display(),
        fail_unsigned = config.fail_unsigned,
        "Starting audit"
    );

    let processor = ImageProcessor::new(
        workdir,
        OcImageExtractor::new(config.timeout),
        RpmQueryInspector::new(config.timeout),
    );
    let output = ReportGenerator::new(config.report.clone());
    let results = run_audit(
        &config.images,
        config.fail_unsigned,
        config.jobs,
        &processor,
        &output,
    )?;

    // Explicitly close the temporary directory to prevent any errors from being hidden.
    if let Some(scratch) = scratch {
        scratch
            .close()
            .context("Failed to remove temporary working directory")?;
    }
    validate_results(&results, config.fail_unsigned)
}

/// Get the working directory, creating a temporary one if none was configured.
///
/// # Errors
/// Returns an error if the temporary directory cannot be created.
fn create_workdir(config: &Config) -> Result<(PathBuf, Option<TempDir>)> {
    if let Some(workdir) = &config.workdir {
        return Ok((workdir.clone(), None));
    }
    let scratch = TempDir::new().context("Failed to create temporary working directory")?;
    Ok((scratch.path().to_path_buf(), Some(scratch)))
}

/// Initialize tracing on stderr with the requested verbosity.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
