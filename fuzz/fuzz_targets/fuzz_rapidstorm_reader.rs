#![no_main]

use libfuzzer_sys::fuzz_target;
use movieinfo::formats::LocalisationFormat;
use movieinfo::localisation::UnitConversion;
use movieinfo::pipeline::convert_table;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must either parse or fail with an error, never panic
    let units = UnitConversion::new(100.0, 2.0);
    if let Ok(table) = LocalisationFormat::RapidStorm.read_from(Cursor::new(data), &units) {
        let _ = convert_table(&table);
    }
});
