//! # linky-tic - A Rust Crate for the Linky Télé-Information Client Protocol
//!
//! French Linky electricity meters continuously broadcast their readings on a
//! serial output, the Télé-Information Client (TIC). The linky-tic crate
//! decodes that byte stream into a cache of the latest values, ready to be
//! consumed by a home automation system or any other client.
//!
//! ## Features
//!
//! - Historic (1200 baud) and standard (9600 baud) TIC modes, 7E1 serial line
//! - Group parsing and checksum validation, with detailed checksum diagnostics
//! - Frame tracking, including the short frame bursts of three-phase historic meters
//! - Staleness cleanup of tags missing from the last frame
//! - Meter identification from the EURIDIS address, and status register decoding
//! - Push notifications, with forced refresh hints for urgent tags
//! - A reconnecting tokio worker, a serial port probe, and logging helpers
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! linky-tic = "1.0.0"
//! ```
//!
//! ```rust,no_run
//! use linky_tic::{start_reader, TicConfig, TicMode};
//!
//! # async fn run() {
//! let config = TicConfig::new("/dev/ttyUSB0", TicMode::Standard);
//! let reader = start_reader(&config);
//! let decoder = reader.decoder();
//!
//! decoder.register_push_notification("SINSTS", |n| println!("{} changed", n.tag));
//! // ...
//! let (power, _) = decoder.get_value("SINSTS");
//! reader.stop();
//! reader.join().await.ok();
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod identity;
pub mod logging;
pub mod status_register;
pub mod tic;

pub use crate::config::TicConfig;
pub use crate::error::{ChecksumMismatch, TicError};
pub use crate::logging::{init_logger, log_info};

pub use decoder::{
    CachedValue, ConnectionState, DecoderOptions, DecoderSnapshot, DecoderStats, LineOutcome,
    PushKind, PushNotification, ReaderSettings, StreamDecoder, TicReader,
};
pub use identity::{decode_address, DeviceIdentity};
pub use status_register::{get_status, StatusRegisterField, StatusValue};
pub use tic::{parse_group, probe, Group, Horodate, SerialConfig, SerialConnector, TicMode};

/// Starts decoding the meter described by `config`.
///
/// Spawns the reader worker on the current tokio runtime; the worker keeps
/// reconnecting until [`TicReader::stop`] is called.
pub fn start_reader(config: &TicConfig) -> TicReader {
    let decoder = StreamDecoder::shared(DecoderOptions::from(config));
    TicReader::spawn(
        SerialConnector::new(config.serial_config()),
        decoder,
        ReaderSettings::from(config),
    )
}
