// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rpm_verifier::audit::run_audit;
use rpm_verifier::image::{DatabaseError, InspectionError};
use rpm_verifier::{
    DatabaseHandle, DatabaseResolver, ImageProcessor, OutputGenerator, ProcessedImage,
    SignatureInspector,
};

/// Resolver that records its calls and hands out a database named after the image.
#[derive(Default)]
struct RecordingResolver {
    calls: Mutex<Vec<(PathBuf, String)>>,
    broken: Option<&'static str>,
}

impl DatabaseResolver for RecordingResolver {
    fn resolve(&self, workdir: &Path, image: &str) -> Result<DatabaseHandle, DatabaseError> {
        self.calls
            .lock()
            .unwrap()
            .push((workdir.to_path_buf(), image.to_string()));
        if self.broken == Some(image) {
            return Err(DatabaseError::NoDatabase {
                image: image.to_string(),
                locations: vec!["/var/lib/rpm/"],
            });
        }
        Ok(DatabaseHandle::new(PathBuf::from(image)))
    }
}

/// Inspector answering from a fixed table keyed by database path.
struct TableInspector(HashMap<&'static str, Vec<String>>);

impl SignatureInspector for TableInspector {
    fn unsigned_rpms(&self, database: &DatabaseHandle) -> Result<Vec<String>, InspectionError> {
        let key = database.path().to_string_lossy();
        Ok(self.0.get(&*key).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingOutput {
    calls: RefCell<Vec<(Vec<ProcessedImage>, bool)>>,
}

impl OutputGenerator for RecordingOutput {
    fn generate(&self, results: &[ProcessedImage], fail_unsigned: bool) -> anyhow::Result<()> {
        self.calls
            .borrow_mut()
            .push((results.to_vec(), fail_unsigned));
        Ok(())
    }
}

fn table() -> TableInspector {
    TableInspector(HashMap::from([
        ("img1", vec![]),
        ("img2", vec!["my-unsigned-rpm".to_string()]),
        (
            "img3",
            vec![
                "their-unsigned-rpm".to_string(),
                "my-unsigned-rpm".to_string(),
            ],
        ),
    ]))
}

fn images(images: &[&str]) -> Vec<String> {
    images.iter().map(ToString::to_string).collect()
}

#[test]
fn test_audit_single_image() {
    let processor = ImageProcessor::new(
        PathBuf::from("some/path"),
        RecordingResolver::default(),
        table(),
    );
    let output = RecordingOutput::default();

    let results = run_audit(
        &images(&["img1"]),
        true,
        NonZeroUsize::MIN,
        &processor,
        &output,
    )
    .expect("Audit should succeed");

    let expected = vec![ProcessedImage::new("img1", vec![])];
    assert_eq!(results, expected);
    assert_eq!(*output.calls.borrow(), vec![(expected, true)]);
}

#[test]
fn test_audit_many_images_keeps_order() {
    let resolver = RecordingResolver::default();
    let processor = ImageProcessor::new(PathBuf::from("/work"), resolver, table());
    let output = RecordingOutput::default();

    let results = run_audit(
        &images(&["img3", "img1", "img2"]),
        false,
        NonZeroUsize::new(3).unwrap(),
        &processor,
        &output,
    )
    .expect("Audit should succeed");

    let names: Vec<&str> = results.iter().map(ProcessedImage::image).collect();
    assert_eq!(names, vec!["img3", "img1", "img2"]);
    assert_eq!(
        results[0].unsigned_rpms(),
        ["their-unsigned-rpm", "my-unsigned-rpm"]
    );
    assert!(!results[1].has_unsigned());
    assert_eq!(output.calls.borrow().len(), 1);
    assert!(!output.calls.borrow()[0].1);
}

#[test]
fn test_audit_aborts_on_database_error() {
    let resolver = RecordingResolver {
        broken: Some("img2"),
        ..RecordingResolver::default()
    };
    let processor = ImageProcessor::new(PathBuf::from("/work"), resolver, table());
    let output = RecordingOutput::default();

    let err = run_audit(
        &images(&["img1", "img2", "img3"]),
        true,
        NonZeroUsize::MIN,
        &processor,
        &output,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Failed to process image: img2");
    assert!(format!("{err:#}").contains("No RPM database found in image img2"));
    assert!(output.calls.borrow().is_empty());
}
