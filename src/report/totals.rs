// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Statistics over the processed images.

use serde::Serialize;

use crate::image::ProcessedImage;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub(crate) struct ReportTotals {
    pub(crate) images: usize,
    pub(crate) images_with_unsigned: usize,
    pub(crate) unsigned_rpms: usize,
}

impl ReportTotals {
    #[must_use]
    pub(crate) fn calculate(results: &[ProcessedImage]) -> Self {
        results.iter().fold(
            Self {
                images: results.len(),
                ..Self::default()
            },
            |mut acc, result| {
                if result.has_unsigned() {
                    acc.images_with_unsigned += 1;
                    acc.unsigned_rpms += result.unsigned_rpms().len();
                }
                acc
            },
        )
    }
}
