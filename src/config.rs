// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Validated run configuration.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::rpmdb::DEFAULT_COMMAND_TIMEOUT;

/// Invalid input, detected before any image is processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No images given")]
    NoImages,
    #[error("Working directory does not exist: {0:?}")]
    WorkdirNotFound(PathBuf),
    #[error("Working directory is not a directory: {0:?}")]
    WorkdirNotADirectory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub images: Vec<String>,
    pub fail_unsigned: bool,
    /// `None` means a temporary directory is used.
    pub workdir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub jobs: NonZeroUsize,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            fail_unsigned: false,
            workdir: None,
            report: None,
            jobs: NonZeroUsize::MIN,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// Image references are trimmed and blank ones dropped.
    ///
    /// # Errors
    /// Returns an error if no images remain or the working directory is unusable.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.images = self
            .images
            .iter()
            .map(|image| image.trim())
            .filter(|image| !image.is_empty())
            .map(ToString::to_string)
            .collect();
        if self.images.is_empty() {
            return Err(ConfigError::NoImages);
        }

        if let Some(workdir) = &self.workdir {
            if !workdir.exists() {
                return Err(ConfigError::WorkdirNotFound(workdir.clone()));
            }
            if !workdir.is_dir() {
                return Err(ConfigError::WorkdirNotADirectory(workdir.clone()));
            }
        }
        Ok(self)
    }
}
