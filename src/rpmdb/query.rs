// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Queries an extracted RPM database for packages without a signature.

use std::process::Command;
use std::time::Duration;
use tracing::debug;

use super::command::run_with_timeout;
use crate::image::{DatabaseHandle, InspectionError, SignatureInspector};

/// `rpm --queryformat` printing `<name>-<version>-<release> <signature>` per package.
pub const QUERY_FORMAT: &str = "%{NAME}-%{VERSION}-%{RELEASE} %{SIGPGP:pgpsig}\n";

/// Imported public keys show up as packages with this name prefix.
const GPG_PUBKEY_PREFIX: &str = "gpg-pubkey";

/// Lists unsigned packages by running `rpm -qa --dbpath <database>`.
pub struct RpmQueryInspector {
    program: String,
    timeout: Duration,
}

impl RpmQueryInspector {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("rpm", timeout)
    }

    #[must_use]
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl SignatureInspector for RpmQueryInspector {
    fn unsigned_rpms(&self, database: &DatabaseHandle) -> Result<Vec<String>, InspectionError> {
        let path = database.path();
        let output = run_with_timeout(
            Command::new(&self.program)
                .args(["-qa", "--qf", QUERY_FORMAT, "--dbpath"])
                .arg(path),
            self.timeout,
        )
        .map_err(|e| InspectionError::Command {
            database: path.to_path_buf(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(InspectionError::QueryFailed {
                database: path.to_path_buf(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| InspectionError::InvalidOutput {
            database: path.to_path_buf(),
            source: e,
        })?;
        let unsigned = parse_unsigned(&stdout);
        debug!(database = %path.display(), unsigned = unsigned.len(), "Queried package signatures");
        Ok(unsigned)
    }
}

/// Pick the unsigned packages out of `rpm -qa --qf QUERY_FORMAT` output.
///
/// A package counts as signed only if its signature mentions a key id. Order is kept.
#[must_use]
pub fn parse_unsigned(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (package, signature) = line.split_once(' ').unwrap_or((line, ""));
            if package.starts_with(GPG_PUBKEY_PREFIX) || signature.contains("Key ID") {
                None
            } else {
                Some(package.to_string())
            }
        })
        .collect()
}
