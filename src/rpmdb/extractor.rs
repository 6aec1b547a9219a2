// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Implements RPM database extraction from container images using `oc image extract`.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info};

use super::command::{run_with_timeout, CommandError};
use crate::image::{DatabaseError, DatabaseHandle, DatabaseResolver};

/// Locations of the RPM database inside an image, in lookup order.
pub const RPMDB_LOCATIONS: [&str; 2] = ["/var/lib/rpm/", "/usr/lib/sysimage/rpm/"];

/// Extracts the RPM database of an image into a scratch directory below the workdir.
pub struct OcImageExtractor {
    program: String,
    timeout: Duration,
}

impl OcImageExtractor {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("oc", timeout)
    }

    /// Use `program` instead of `oc`. It must accept the `oc image extract` arguments.
    #[must_use]
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Extract `location` of `image` into `dest`.
    ///
    /// Returns `Ok(false)` if the command ran but nothing was extracted.
    fn extract(&self, image: &str, location: &str, dest: &Path) -> Result<bool, CommandError> {
        let output = run_with_timeout(
            Command::new(&self.program)
                .args(["image", "extract", image, "--path"])
                .arg(format!("{location}:{}", dest.display())),
            self.timeout,
        )?;

        if !output.status.success() {
            debug!(
                image,
                location,
                code = output.status.code().unwrap_or(-1),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Extraction did not succeed"
            );
            return Ok(false);
        }
        Ok(!is_empty_dir(dest))
    }
}

impl DatabaseResolver for OcImageExtractor {
    fn resolve(&self, workdir: &Path, image: &str) -> Result<DatabaseHandle, DatabaseError> {
        for location in RPMDB_LOCATIONS {
            // Every attempt starts from an empty directory of its own, so neither
            // concurrent images nor a failed earlier attempt can leave files behind.
            let scratch = tempfile::Builder::new()
                .prefix("rpmdb-")
                .tempdir_in(workdir)
                .map_err(|e| DatabaseError::ScratchDirFailed {
                    workdir: workdir.to_path_buf(),
                    source: e,
                })?;

            info!(image, location, "Extracting RPM database");
            match self.extract(image, location, scratch.path()) {
                Ok(true) => return Ok(DatabaseHandle::in_scratch(scratch)),
                Ok(false) => close(scratch),
                Err(e) => {
                    close(scratch);
                    return Err(DatabaseError::Command {
                        image: image.to_string(),
                        source: e,
                    });
                }
            }
        }

        Err(DatabaseError::NoDatabase {
            image: image.to_string(),
            locations: RPMDB_LOCATIONS.to_vec(),
        })
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).map_or(true, |mut entries| entries.next().is_none())
}

fn close(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        debug!(path = %path.display(), error = %e, "Failed to remove scratch directory");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable shell script standing in for `oc`.
    fn fake_oc(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-oc");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_missing_program() {
        let workdir = TempDir::new().unwrap();
        let extractor =
            OcImageExtractor::with_program("rpm-verifier-no-such-oc", Duration::from_secs(5));
        let err = extractor.resolve(workdir.path(), "my-img").unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Command {
                source: CommandError::NotFound { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_no_database_when_extraction_fails() {
        let bin = TempDir::new().unwrap();
        let workdir = TempDir::new().unwrap();
        let oc = fake_oc(bin.path(), "exit 1");
        let extractor = OcImageExtractor::with_program(oc, Duration::from_secs(5));

        let err = extractor.resolve(workdir.path(), "my-img").unwrap_err();
        match err {
            DatabaseError::NoDatabase { image, locations } => {
                assert_eq!(image, "my-img");
                assert_eq!(locations, RPMDB_LOCATIONS.to_vec());
            }
            other => panic!("Expected NoDatabase, got {other:?}"),
        }
        // The scratch directory is cleaned up again.
        assert!(is_empty_dir(workdir.path()));
    }

    #[test]
    fn test_falls_back_to_sysimage_location() {
        let bin = TempDir::new().unwrap();
        let workdir = TempDir::new().unwrap();
        // $4 is "--path", $5 is "<location>:<dest>".
        let oc = fake_oc(
            bin.path(),
            r#"case "$5" in
/usr/lib/sysimage/rpm/:*) touch "${5#*:}/rpmdb.sqlite" ;;
esac
exit 0"#,
        );
        let extractor = OcImageExtractor::with_program(oc, Duration::from_secs(5));

        let handle = extractor.resolve(workdir.path(), "my-img").unwrap();
        assert!(handle.path().starts_with(workdir.path()));
        assert!(handle.path().join("rpmdb.sqlite").exists());

        let scratch = handle.path().to_path_buf();
        drop(handle);
        assert!(!scratch.exists());
    }

    #[test]
    fn test_partial_extraction_is_not_reused_by_next_location() {
        let bin = TempDir::new().unwrap();
        let workdir = TempDir::new().unwrap();
        // The first location fails after writing a file, the second extracts nothing.
        let oc = fake_oc(
            bin.path(),
            r#"case "$5" in
/var/lib/rpm/:*) touch "${5#*:}/rpmdb.sqlite-partial"; exit 1 ;;
esac
exit 0"#,
        );
        let extractor = OcImageExtractor::with_program(oc, Duration::from_secs(5));

        let err = extractor.resolve(workdir.path(), "my-img").unwrap_err();
        assert!(matches!(err, DatabaseError::NoDatabase { .. }));
        assert!(is_empty_dir(workdir.path()));
    }
}
