#![no_main]

use libfuzzer_sys::fuzz_target;
use stepwise::time_value::parse_duration_str;

fuzz_target!(|data: &[u8]| {
    // Any text either parses to seconds or yields a format error; never panics
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_duration_str(input);
    }
});
