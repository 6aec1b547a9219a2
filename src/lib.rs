// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! A tool for auditing container images for unsigned RPM packages.
//!
//! This crate provides functionality to:
//! - Extract the RPM database of a container image
//! - Query the database for packages without a valid signature
//! - Aggregate the results over many images and decide pass/fail
//! - Generate console and JSON reports

pub mod audit;
pub mod config;
pub mod image;
pub mod report;
pub mod rpmdb;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use image::{
    DatabaseHandle, DatabaseResolver, ImageProcessor, ProcessedImage, SignatureInspector,
};
pub use report::{OutputGenerator, Report, ReportGenerator, Verdict};
