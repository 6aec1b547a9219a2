// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use rpm_verifier::Config;

#[derive(Parser)]
#[command(name = "rpm_verifier")]
#[command(version)]
#[command(about = "Audits container images for unsigned RPM packages")]
pub(crate) struct Args {
    /// Container image(s) to audit. Repeat the flag or pass several values.
    #[arg(long = "input", value_name = "IMAGE", required = true, num_args = 1..)]
    pub images: Vec<String>,

    /// Exit with an error if any image contains unsigned RPMs.
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value_t = false
    )]
    pub fail_unsigned: bool,

    #[arg(
        long,
        long_help = "Working directory for extracted RPM databases.\n\
                Each image gets its own subdirectory, removed after inspection.\n\
                Defaults to a temporary directory."
    )]
    pub workdir: Option<PathBuf>,

    /// Path to the file to write the audit results in JSON format.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Number of images to process concurrently.
    #[arg(long, default_value = "1")]
    pub jobs: NonZeroUsize,

    /// Timeout in seconds for each `oc`/`rpm` invocation.
    #[arg(long, value_name = "SECONDS", default_value_t = 300)]
    pub timeout: u64,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub(crate) fn into_config(self) -> Config {
        Config {
            images: self.images,
            fail_unsigned: self.fail_unsigned,
            workdir: self.workdir,
            report: self.report,
            jobs: self.jobs,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
