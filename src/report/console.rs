// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Formats and prints report summaries to the console.

use comfy_table::{Cell, Table};

use super::Report;
use crate::image::ProcessedImage;

/// Summarize the report to the console.
///
/// Prints the verdict, image statistics, and the unsigned RPMs of every image
/// that has any.
pub fn summarize_report(report: &Report<'_>) {
    println!("Result: {}", report.result);
    println!("Fail on unsigned RPMs: {}\n", report.fail_unsigned);

    println!("{}\n", totals_table(report));

    let unsigned: Vec<&ProcessedImage> = report
        .images
        .iter()
        .filter(|image| image.has_unsigned())
        .collect();

    if !unsigned.is_empty() {
        println!("{}", unsigned_rpms_table(&unsigned));
        println!(
            "\nTotal: {} image(s) with unsigned RPMs",
            report.totals.images_with_unsigned
        );
    }
}

/// Create a table with the default preset styling.
fn default_table_preset() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL_CONDENSED)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table
}

fn totals_table(report: &Report) -> Table {
    let mut table = default_table_preset();
    table
        .set_header(vec![
            Cell::new("Images").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Count").add_attribute(comfy_table::Attribute::Bold),
        ])
        .add_row(vec![
            Cell::new("With unsigned RPMs"),
            Cell::new(report.totals.images_with_unsigned),
        ])
        .add_row(vec![
            Cell::new("Fully signed"),
            Cell::new(report.totals.images - report.totals.images_with_unsigned),
        ])
        .add_row(vec![
            Cell::new("Total").add_attribute(comfy_table::Attribute::Bold),
            Cell::new(report.totals.images).add_attribute(comfy_table::Attribute::Bold),
        ])
        .add_row(vec![
            Cell::new("Unsigned RPMs").add_attribute(comfy_table::Attribute::Bold),
            Cell::new(report.totals.unsigned_rpms).add_attribute(comfy_table::Attribute::Bold),
        ]);
    table
}

/// Create a table listing the unsigned RPMs of each image, in input order.
fn unsigned_rpms_table(images: &[&ProcessedImage]) -> Table {
    let mut table = default_table_preset();
    table.set_header(vec![
        Cell::new("Image").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Unsigned RPMs").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for image in images {
        table.add_row(vec![
            Cell::new(image.image()),
            Cell::new(image.unsigned_rpms().join(", ")),
        ]);
    }
    table
}
