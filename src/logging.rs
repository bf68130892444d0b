//! # Logging
//!
//! `log` facade helpers shared by the library and the binary: logger setup,
//! rate limiting for noisy serial lines and hex dumps of undecodable bytes.

use log::{debug, error, info, log_enabled, warn, Level};
use std::time::{Duration, Instant};

/// Hex dumps are cut after this many bytes.
const MAX_LOG_BYTES: usize = 64;

/// Initializes the logger with the `env_logger` crate.
///
/// Defaults to the `info` level, `RUST_LOG` overrides it. Calling it twice is
/// harmless.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}

/// Lowercase hex rendering of at most 64 bytes.
pub fn hex_dump(data: &[u8]) -> String {
    if data.len() > MAX_LOG_BYTES {
        format!(
            "{} ... ({} bytes total)",
            hex::encode(&data[..MAX_LOG_BYTES]),
            data.len()
        )
    } else {
        hex::encode(data)
    }
}

/// Logs raw line bytes at debug level.
pub fn log_line_hex(prefix: &str, data: &[u8]) {
    if log_enabled!(Level::Debug) {
        debug!("{prefix}: {}", hex_dump(data));
    }
}

/// Rate limiter for repeated log messages.
///
/// A meter with a bad cable may emit hundreds of corrupted lines per minute;
/// past `cap` messages in a window the rest are counted and dropped.
#[derive(Debug)]
pub struct LogThrottle {
    window: Duration,
    cap: u32,
    count: u32,
    suppressed: u64,
    t0: Instant,
}

impl LogThrottle {
    pub fn new(window_ms: u64, cap: u32) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            cap,
            count: 0,
            suppressed: 0,
            t0: Instant::now(),
        }
    }

    /// Returns `true` if the message should be logged.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.t0) > self.window {
            if self.suppressed > 0 {
                warn!("{} similar messages suppressed", self.suppressed);
            }
            self.t0 = now;
            self.count = 0;
            self.suppressed = 0;
        }

        self.count += 1;
        let allowed = self.count <= self.cap;
        if !allowed {
            self.suppressed += 1;
        }
        allowed
    }

    /// Messages dropped in the current window.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    pub fn reset(&mut self) {
        self.t0 = Instant::now();
        self.count = 0;
        self.suppressed = 0;
    }
}

impl Default for LogThrottle {
    /// Ten messages per minute.
    fn default() -> Self {
        Self::new(60_000, 10)
    }
}

/// Logs an error unless the throttle is exhausted.
#[macro_export]
macro_rules! log_error_throttled {
    ($throttle:expr, $($arg:tt)*) => {
        if $throttle.allow() {
            log::error!($($arg)*);
        }
    };
}

/// Logs a warning unless the throttle is exhausted.
#[macro_export]
macro_rules! log_warn_throttled {
    ($throttle:expr, $($arg:tt)*) => {
        if $throttle.allow() {
            log::warn!($($arg)*);
        }
    };
}
