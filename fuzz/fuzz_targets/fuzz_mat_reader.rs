#![no_main]

use libfuzzer_sys::fuzz_target;
use movieinfo::mat::{movie_info_from_value, read_variables};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    if let Ok(variables) = read_variables(Cursor::new(data)) {
        for variable in &variables {
            let _ = movie_info_from_value(&variable.value);
        }
    }
});
