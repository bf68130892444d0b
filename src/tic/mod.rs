//! # Linky TIC Wire Protocol
//!
//! Everything needed to turn raw serial bytes into validated groups: the two
//! transmission modes, checksum computation, group parsing, horodate decoding
//! and the serial transport.

pub mod checksum;
pub mod group;
pub mod horodate;
pub mod mode;
pub mod serial;

pub use group::{contains_frame_end, parse_group, strip_line_end, Group};
pub use horodate::{Horodate, Season};
pub use mode::TicMode;
pub use serial::{probe, probe_with, Connector, LineReader, SerialConfig, SerialConnector};
