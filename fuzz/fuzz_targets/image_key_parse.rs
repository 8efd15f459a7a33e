//! Fuzz target for image id validation.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = beecell::model::fuzz_image_key(input);
    }
});
