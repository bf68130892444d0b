//! Tests for the logging helpers of the `linky-tic` crate.

use linky_tic::logging::{
    hex_dump, init_logger, log_debug, log_error, log_info, log_line_hex, log_warn, LogThrottle,
};
use linky_tic::{log_error_throttled, log_warn_throttled};

/// Tests that the logging helpers do not panic after init.
#[test]
fn test_logging() {
    init_logger();
    log_error("This is an error message");
    log_warn("This is a warning message");
    log_info("This is an info message");
    log_debug("This is a debug message");
    log_line_hex("Raw line", b"PAPP 00390 -\r\n");
}

/// Tests that initializing the logger twice is harmless.
#[test]
fn test_init_logger_twice() {
    init_logger();
    init_logger();
}

#[test]
fn test_throttled_macros() {
    let mut throttle = LogThrottle::new(60_000, 2);
    for i in 0..5 {
        log_error_throttled!(throttle, "checksum error {i}");
    }
    assert_eq!(throttle.suppressed(), 3);

    let mut throttle = LogThrottle::new(60_000, 0);
    log_warn_throttled!(throttle, "never logged");
    assert_eq!(throttle.suppressed(), 1);
}

#[test]
fn test_hex_dump() {
    assert_eq!(hex_dump(b"\x02\x03"), "0203");
    assert_eq!(hex_dump(&[]), "");
}
