#![no_main]

use libfuzzer_sys::fuzz_target;
use linky_tic::identity::decode_address;
use linky_tic::status_register::decode_all;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_all(text);
        let _ = decode_address(text);
    }
});
