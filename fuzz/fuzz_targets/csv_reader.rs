#![no_main]

use libfuzzer_sys::fuzz_target;
use stepwise::csv_input::parse_csv;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(dataset) = parse_csv(input) {
            // Every parsed row carries exactly one value per header column
            for record in dataset.iter() {
                for column in &dataset.columns {
                    assert!(record.has_column(column));
                }
            }
        }
    }
});
