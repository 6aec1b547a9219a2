// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Defines the error types raised while resolving and inspecting package databases.

use std::path::PathBuf;
use thiserror::Error;

use crate::rpmdb::CommandError;

/// The image could not be resolved into an inspectable package database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to create scratch directory in {workdir:?}")]
    ScratchDirFailed {
        workdir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to extract package database from image {image}")]
    Command {
        image: String,
        #[source]
        source: CommandError,
    },
    #[error("No RPM database found in image {image} (tried: {locations:?})")]
    NoDatabase {
        image: String,
        locations: Vec<&'static str>,
    },
}

/// Signature status could not be determined for a resolved database.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("Failed to query package database {database:?}")]
    Command {
        database: PathBuf,
        #[source]
        source: CommandError,
    },
    #[error("Package query failed for database {database:?} (exit status {code}): {stderr}")]
    QueryFailed {
        database: PathBuf,
        code: i32,
        stderr: String,
    },
    #[error("Package query returned non UTF-8 output for database {database:?}")]
    InvalidOutput {
        database: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Failure while processing a single image.
///
/// Wraps the getter error unchanged, tagged with the stage that raised it.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Database error")]
    Database(#[from] DatabaseError),
    #[error("Inspection error")]
    Inspection(#[from] InspectionError),
}
