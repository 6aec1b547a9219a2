// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Defines the lookups injected into the `ImageProcessor`.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::errors::{DatabaseError, InspectionError};

/// Handle to a package database produced by a `DatabaseResolver`.
///
/// Only the matching `SignatureInspector` looks inside. A handle may own the
/// scratch directory holding the database; it is removed when the handle is dropped.
#[derive(Debug)]
pub struct DatabaseHandle {
    path: PathBuf,
    _scratch: Option<TempDir>,
}

impl DatabaseHandle {
    /// Create a handle to a database at `path` that the handle does not own.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _scratch: None,
        }
    }

    /// Create a handle owning `scratch`, with the database at `scratch` itself.
    #[must_use]
    pub(crate) fn in_scratch(scratch: TempDir) -> Self {
        Self {
            path: scratch.path().to_path_buf(),
            _scratch: Some(scratch),
        }
    }

    /// Get the path of the database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolves an image into a local package database.
#[cfg_attr(test, mockall::automock)]
pub trait DatabaseResolver: Send + Sync {
    /// Produce or locate the package database of `image`, using `workdir` as scratch space.
    ///
    /// # Errors
    /// Returns an error if the image cannot be resolved into a package database.
    fn resolve(&self, workdir: &Path, image: &str) -> Result<DatabaseHandle, DatabaseError>;
}

/// Lists the packages of a database that lack a valid signature.
#[cfg_attr(test, mockall::automock)]
pub trait SignatureInspector: Send + Sync {
    /// Names of the unsigned packages, in the order the database reports them.
    ///
    /// # Errors
    /// Returns an error if the signatures cannot be evaluated.
    fn unsigned_rpms(&self, database: &DatabaseHandle) -> Result<Vec<String>, InspectionError>;
}
