// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Validates audit results and returns an error when unsigned RPMs must fail the run.

use anyhow::Result;
use tracing::{error, warn};

use super::Verdict;
use crate::image::ProcessedImage;

/// Validate the results.
///
/// # Errors
/// Returns an error if `fail_unsigned` is set and any image has unsigned RPMs.
pub fn validate_results(results: &[ProcessedImage], fail_unsigned: bool) -> Result<()> {
    let unsigned = results.iter().filter(|result| result.has_unsigned());
    match Verdict::new(results, fail_unsigned) {
        Verdict::Success => Ok(()),
        Verdict::Warning => {
            for result in unsigned {
                warn!(
                    image = result.image(),
                    rpms = ?result.unsigned_rpms(),
                    "Unsigned RPMs found"
                );
            }
            Ok(())
        }
        Verdict::Failure => {
            let count = unsigned
                .inspect(|result| {
                    error!(
                        image = result.image(),
                        rpms = ?result.unsigned_rpms(),
                        "Unsigned RPMs found"
                    );
                })
                .count();
            Err(anyhow::anyhow!(
                "Unsigned RPMs found in the audit: {count} image(s) with unsigned RPMs"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<ProcessedImage> {
        vec![
            ProcessedImage::new("signed", vec![]),
            ProcessedImage::new("unsigned", vec!["my-unsigned-rpm".to_string()]),
        ]
    }

    #[test]
    fn test_fail_unsigned_with_unsigned_fails() {
        let err = validate_results(&results(), true).unwrap_err();
        assert!(err.to_string().contains("1 image(s) with unsigned RPMs"));
    }

    #[test]
    fn test_unsigned_without_fail_flag_passes() {
        assert!(validate_results(&results(), false).is_ok());
    }

    #[test]
    fn test_all_signed_passes() {
        let results = vec![ProcessedImage::new("signed", vec![])];
        assert!(validate_results(&results, true).is_ok());
        assert!(validate_results(&results, false).is_ok());
    }
}
