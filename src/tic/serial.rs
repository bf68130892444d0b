//! # TIC Serial Communication
//!
//! This module provides the transport side of the TIC decoder: opening the
//! serial port with the 7E1 line settings of the selected mode, splitting the
//! incoming byte stream into LF terminated lines, and a one-shot probe used to
//! validate a device before committing to it.
//!
//! The line reader is generic over any `AsyncRead`, so it works the same with a
//! `tokio_serial::SerialStream` or with an in-memory mock in tests.

use crate::constants::{DEFAULT_READ_TIMEOUT_MS, DEFAULT_SERIAL_PORT, LF, MAX_LINE_LEN};
use crate::error::TicError;
use crate::tic::group::printable;
use crate::tic::mode::TicMode;
use bytes::{Bytes, BytesMut};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_serial::SerialPortBuilderExt;

/// Configuration for serial connection.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialConfig {
    pub port: String,
    pub mode: TicMode,
    /// Time after which a read with no complete line yields nothing.
    pub timeout: Duration,
}

impl SerialConfig {
    pub fn new(port: &str, mode: TicMode) -> Self {
        SerialConfig {
            port: port.to_string(),
            mode,
            ..Default::default()
        }
    }

    pub fn baudrate(&self) -> u32 {
        self.mode.baud_rate()
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port: DEFAULT_SERIAL_PORT.to_string(),
            mode: TicMode::Historic,
            timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

/// Splits a byte stream into LF terminated lines.
pub struct LineReader<R> {
    port: R,
    buf: BytesMut,
}

impl<R: AsyncRead + Unpin + Send> LineReader<R> {
    pub fn new(port: R) -> Self {
        LineReader {
            port,
            buf: BytesMut::with_capacity(MAX_LINE_LEN),
        }
    }

    /// Reads the next line, terminator included.
    ///
    /// Returns `Ok(None)` at end of stream. Cancelling the returned future
    /// loses no data: bytes already received stay in the internal buffer.
    pub async fn next_line(&mut self) -> Result<Option<Bytes>, TicError> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == LF) {
                return Ok(Some(self.buf.split_to(pos + 1).freeze()));
            }
            if self.buf.len() > MAX_LINE_LEN {
                warn!(
                    "Dropping {} bytes received without line end: {}",
                    self.buf.len(),
                    printable(&self.buf[..32])
                );
                self.buf.clear();
            }
            let n = self
                .port
                .read_buf(&mut self.buf)
                .await
                .map_err(|e| TicError::SerialPortError(e.to_string()))?;
            if n == 0 {
                return Ok(None);
            }
        }
    }

    /// Bytes received but not yet returned as a line.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }
}

/// Opens the byte stream a TIC worker reads from.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    type Port: AsyncRead + Unpin + Send + 'static;

    async fn connect(&self) -> Result<Self::Port, TicError>;

    /// Human readable name of the underlying device.
    fn describe(&self) -> String;
}

/// Connector opening a real serial device.
#[derive(Debug, Clone)]
pub struct SerialConnector {
    config: SerialConfig,
}

impl SerialConnector {
    pub fn new(config: SerialConfig) -> Self {
        SerialConnector { config }
    }
}

#[async_trait::async_trait]
impl Connector for SerialConnector {
    type Port = tokio_serial::SerialStream;

    /// Opens the port with 7 data bits, even parity and one stop bit, at the
    /// baud rate of the configured mode.
    async fn connect(&self) -> Result<Self::Port, TicError> {
        let port = tokio_serial::new(&self.config.port, self.config.baudrate())
            .data_bits(tokio_serial::DataBits::Seven)
            .parity(tokio_serial::Parity::Even)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(self.config.timeout)
            .open_native_async()
            .map_err(|e| TicError::CannotConnect(format!("{}: {e}", self.config.port)))?;
        info!(
            "Serial connection is now open at {} ({} baud, {} mode)",
            self.config.port,
            self.config.baudrate(),
            self.config.mode
        );
        Ok(port)
    }

    fn describe(&self) -> String {
        self.config.port.clone()
    }
}

/// Validates a serial device by opening it and reading one line.
pub async fn probe(config: &SerialConfig) -> Result<(), TicError> {
    probe_with(&SerialConnector::new(config.clone()), config.timeout).await
}

/// Probe over any connector.
///
/// A read that times out without data is accepted: the device opened and did
/// not fail, the meter may simply be idle or slow.
pub async fn probe_with<C: Connector>(connector: &C, timeout: Duration) -> Result<(), TicError> {
    let port = connector.connect().await.map_err(|e| match e {
        TicError::CannotConnect(msg) => TicError::CannotConnect(msg),
        other => TicError::CannotConnect(format!(
            "Unable to connect to the serial device {}: {other}",
            connector.describe()
        )),
    })?;

    let mut lines = LineReader::new(port);
    match tokio::time::timeout(timeout, lines.next_line()).await {
        Err(_) => {
            warn!(
                "{}: no line received within {:?}",
                connector.describe(),
                timeout
            );
            Ok(())
        }
        Ok(Ok(Some(line))) => {
            debug!("{}: probe read {}", connector.describe(), printable(&line));
            Ok(())
        }
        Ok(Ok(None)) => Err(TicError::CannotRead(format!(
            "{}: end of stream",
            connector.describe()
        ))),
        Ok(Err(e)) => Err(TicError::CannotRead(format!("Failed to read a line: {e}"))),
    }
}
