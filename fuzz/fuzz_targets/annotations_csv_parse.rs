//! Fuzz target for annotation CSV parsing.

#![no_main]

use beecell::model::io_csv::{from_annotations_csv_slice, to_annotations_csv_string};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    // Whatever parses must render again.
    if let Ok(annotations) = from_annotations_csv_slice(data) {
        let _ = to_annotations_csv_string(&annotations);
    }
});
