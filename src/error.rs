//! # TIC Error Handling
//!
//! This module defines the TicError enum, which represents the different error
//! types that can occur in the linky-tic crate.
//!
//! None of these errors is fatal: line level errors are logged and the line is
//! skipped, transport errors reset the decoder state until the port is reopened.

use std::fmt;
use thiserror::Error;

/// Represents the different error types that can occur in the TIC crate.
#[derive(Debug, Error)]
pub enum TicError {
    /// A line did not split into the expected number of fields.
    #[error("Failed to parse line ({fields} fields detected) in {mode} mode: {line}")]
    FieldCount {
        mode: &'static str,
        fields: usize,
        line: String,
    },

    /// The checksum field is empty or longer than one byte.
    #[error("Malformed checksum field {checksum:?} on line {line}")]
    MalformedChecksum { checksum: String, line: String },

    /// A group field holds non ASCII bytes.
    #[error("Non ASCII {field} on line {line}")]
    NonAscii { field: &'static str, line: String },

    /// A group has no tag.
    #[error("Empty tag on line {0}")]
    EmptyTag(String),

    /// A group carries neither a value nor a timestamp.
    #[error("Empty value on line {0}")]
    EmptyValue(String),

    /// The computed checksum differs from the one read on the wire.
    #[error("Invalid checksum: {0}")]
    InvalidChecksum(Box<ChecksumMismatch>),

    /// The meter address is not 12 characters long.
    #[error("Address should be 12 char long, actually {len}: {address}")]
    InvalidAddressLength { len: usize, address: String },

    /// The status register value is not a 32-bit hexadecimal number.
    #[error("Invalid status register value: {0}")]
    InvalidStatusRegister(String),

    /// The decoded status field value has no label.
    #[error("Unknown value {value} for status field {field}")]
    UnknownStatusValue { field: &'static str, value: u32 },

    /// The horodate field could not be decoded.
    #[error("Invalid horodate: {0}")]
    InvalidHorodate(String),

    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// The serial device could not be opened.
    #[error("Cannot connect: {0}")]
    CannotConnect(String),

    /// The serial device was opened but reading a line failed.
    #[error("Cannot read: {0}")]
    CannotRead(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TicError {
    /// True for errors affecting a single line, which never interrupt decoding.
    pub fn is_line_error(&self) -> bool {
        matches!(
            self,
            TicError::FieldCount { .. }
                | TicError::MalformedChecksum { .. }
                | TicError::NonAscii { .. }
                | TicError::EmptyTag(_)
                | TicError::EmptyValue(_)
                | TicError::InvalidChecksum(_)
        )
    }
}

impl From<ChecksumMismatch> for TicError {
    fn from(mismatch: ChecksumMismatch) -> Self {
        TicError::InvalidChecksum(Box::new(mismatch))
    }
}

impl From<std::io::Error> for TicError {
    fn from(e: std::io::Error) -> Self {
        TicError::SerialPortError(e.to_string())
    }
}

impl From<tokio_serial::Error> for TicError {
    fn from(e: tokio_serial::Error) -> Self {
        TicError::SerialPortError(e.to_string())
    }
}

/// Diagnostics of a failed checksum validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumMismatch {
    pub tag: String,
    pub timestamp: Option<String>,
    pub value: String,
    /// Sum of every checksummed byte.
    pub sum: u32,
    /// Low 6 bits of `sum`.
    pub truncated: u8,
    pub computed: u8,
    pub expected: u8,
}

impl fmt::Display for ChecksumMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}) | s1 {} {:#b} | truncated {} {:#b} {:?} | computed {} {:#b} {:?} | expected {} {:#b} {:?}",
            self.tag,
            self.value,
            self.timestamp.as_deref().unwrap_or("None"),
            self.sum,
            self.sum,
            self.truncated,
            self.truncated,
            char::from(self.truncated),
            self.computed,
            self.computed,
            char::from(self.computed),
            self.expected,
            self.expected,
            char::from(self.expected),
        )
    }
}
