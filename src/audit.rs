// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Drives the `ImageProcessor` over all requested images and hands the results to the
//! output generator.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::num::NonZeroUsize;
use tracing::info;

use crate::image::{DatabaseResolver, ImageProcessor, ProcessedImage, SignatureInspector};
use crate::report::OutputGenerator;

/// Audit `images` and generate the report.
///
/// Results are returned in the order of `images`, also when `jobs > 1` processes
/// them concurrently. The first image that fails aborts the audit and no report
/// is generated.
///
/// # Errors
/// Returns an error naming the image if processing fails, or the output generator's error.
pub fn run_audit<R, I, O>(
    images: &[String],
    fail_unsigned: bool,
    jobs: NonZeroUsize,
    processor: &ImageProcessor<R, I>,
    output: &O,
) -> Result<Vec<ProcessedImage>>
where
    R: DatabaseResolver,
    I: SignatureInspector,
    O: OutputGenerator + ?Sized,
{
    let results = if jobs.get() == 1 {
        images
            .iter()
            .map(|image| process_image(processor, image))
            .collect::<Result<Vec<_>>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.get())
            .build()
            .context("Failed to create worker pool")?;
        pool.install(|| {
            images
                .par_iter()
                .map(|image| process_image(processor, image))
                .collect::<Result<Vec<_>>>()
        })?
    };

    output.generate(&results, fail_unsigned)?;
    Ok(results)
}

fn process_image<R, I>(processor: &ImageProcessor<R, I>, image: &str) -> Result<ProcessedImage>
where
    R: DatabaseResolver,
    I: SignatureInspector,
{
    info!(image, "Processing image");
    let processed = processor
        .process(image)
        .with_context(|| format!("Failed to process image: {image}"))?;
    info!(
        image,
        unsigned = processed.unsigned_rpms().len(),
        "Processing completed"
    );
    Ok(processed)
}
