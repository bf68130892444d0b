//! # Reader Configuration
//!
//! Settings of one meter connection, loadable from a JSON file:
//!
//! ```json
//! {
//!   "port": "/dev/ttyUSB0",
//!   "mode": "standard",
//!   "producer": true,
//!   "three_phase": false,
//!   "realtime": false
//! }
//! ```
//!
//! Missing keys take their default value.

use crate::constants::{DEFAULT_READ_TIMEOUT_MS, DEFAULT_RECONNECT_DELAY_MS, DEFAULT_SERIAL_PORT};
use crate::error::TicError;
use crate::tic::mode::TicMode;
use crate::tic::serial::SerialConfig;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicConfig {
    pub port: String,
    pub mode: TicMode,
    /// The meter also measures injected energy (standard mode only).
    pub producer: bool,
    /// Three phase installation, enables short frame handling in historic mode.
    pub three_phase: bool,
    /// Ask consumers to refresh on every update.
    pub realtime: bool,
    pub read_timeout_ms: u64,
    /// Cooldown between two connection attempts.
    pub reconnect_delay_ms: u64,
}

impl Default for TicConfig {
    fn default() -> Self {
        TicConfig {
            port: DEFAULT_SERIAL_PORT.to_string(),
            mode: TicMode::Historic,
            producer: false,
            three_phase: false,
            realtime: false,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
        }
    }
}

impl TicConfig {
    pub fn new(port: &str, mode: TicMode) -> Self {
        TicConfig {
            port: port.to_string(),
            mode,
            ..Default::default()
        }
    }

    /// Loads and validates a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TicError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| TicError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, TicError> {
        let mut config: TicConfig =
            serde_json::from_str(content).map_err(|e| TicError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings, clearing `producer` outside standard mode.
    pub fn validate(&mut self) -> Result<(), TicError> {
        if self.port.trim().is_empty() {
            return Err(TicError::Config("serial port must not be empty".to_string()));
        }
        if self.read_timeout_ms == 0 {
            return Err(TicError::Config("read_timeout_ms must be positive".to_string()));
        }
        if self.producer && self.mode != TicMode::Standard {
            warn!("Producer mode is only available in standard mode, disabling it");
            self.producer = false;
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn serial_config(&self) -> SerialConfig {
        SerialConfig {
            port: self.port.clone(),
            mode: self.mode,
            timeout: self.read_timeout(),
        }
    }
}
