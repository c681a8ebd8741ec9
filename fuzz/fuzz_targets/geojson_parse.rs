//! Fuzz target for GeoJSON label parsing.
//!
//! Arbitrary bytes are parsed as a feature collection and, when that
//! succeeds, turned into labels, checking for panics on odd geometries.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scenelabel::labels::geojson::fuzz_parse_labels;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_labels(data);
});
