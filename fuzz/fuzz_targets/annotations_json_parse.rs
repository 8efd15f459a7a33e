//! Fuzz target for annotation JSON parsing.
//!
//! Arbitrary bytes go to the JSON reader; any input must either parse or
//! return an error, never panic.

#![no_main]

use beecell::model::io_json::from_annotations_json_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_annotations_json_slice(data);
});
