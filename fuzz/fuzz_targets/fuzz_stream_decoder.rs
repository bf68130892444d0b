#![no_main]

use libfuzzer_sys::fuzz_target;
use linky_tic::decoder::{DecoderOptions, StreamDecoder};
use linky_tic::tic::TicMode;

fuzz_target!(|data: &[u8]| {
    let decoder = StreamDecoder::new(DecoderOptions::new(TicMode::Historic).three_phase(true));
    decoder.reset();

    // Split on LF like the line reader does, terminator included.
    for line in data.split_inclusive(|&b| b == b'\n') {
        decoder.process_line(line);
    }
    assert!(decoder.frames_read() >= -1);
    let _ = decoder.snapshot();
});
