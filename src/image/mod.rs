// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Processes a single container image into the list of its unsigned RPMs.

mod errors;
mod getters;

pub use errors::{DatabaseError, InspectionError, ProcessError};
#[cfg(test)]
pub(crate) use getters::{MockDatabaseResolver, MockSignatureInspector};
pub use getters::{DatabaseHandle, DatabaseResolver, SignatureInspector};

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An image together with the unsigned RPMs installed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedImage {
    image: String,
    unsigned_rpms: Vec<String>,
}

impl ProcessedImage {
    #[must_use]
    pub fn new(image: impl Into<String>, unsigned_rpms: Vec<String>) -> Self {
        Self {
            image: image.into(),
            unsigned_rpms,
        }
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Unsigned RPMs in the order the inspector reported them.
    #[must_use]
    pub fn unsigned_rpms(&self) -> &[String] {
        &self.unsigned_rpms
    }

    #[must_use]
    pub fn has_unsigned(&self) -> bool {
        !self.unsigned_rpms.is_empty()
    }
}

/// Composes a `DatabaseResolver` and a `SignatureInspector` for one image at a time.
pub struct ImageProcessor<R, I> {
    workdir: PathBuf,
    resolver: R,
    inspector: I,
}

impl<R: DatabaseResolver, I: SignatureInspector> ImageProcessor<R, I> {
    #[must_use]
    pub fn new(workdir: PathBuf, resolver: R, inspector: I) -> Self {
        Self {
            workdir,
            resolver,
            inspector,
        }
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Process an image.
    ///
    /// # Errors
    /// Returns the resolver or inspector error unchanged. The inspector is not
    /// called when the resolver fails.
    pub fn process(&self, image: &str) -> Result<ProcessedImage, ProcessError> {
        let database = self.resolver.resolve(&self.workdir, image)?;
        debug!(image, database = %database.path().display(), "Resolved package database");
        let unsigned_rpms = self.inspector.unsigned_rpms(&database)?;
        Ok(ProcessedImage::new(image, unsigned_rpms))
    }
}
