#![no_main]

use libfuzzer_sys::fuzz_target;
use linky_tic::tic::{parse_group, TicMode};

fuzz_target!(|data: &[u8]| {
    let _ = parse_group(data, TicMode::Historic);
    let _ = parse_group(data, TicMode::Standard);
});
