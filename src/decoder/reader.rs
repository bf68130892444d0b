//! # Reader Worker
//!
//! Owns the serial connection of one meter and feeds its lines to a shared
//! [`StreamDecoder`]. The worker reconnects on its own after a transport error,
//! waiting a cooldown between attempts, until it is stopped.

use crate::config::TicConfig;
use crate::constants::{DEFAULT_READ_TIMEOUT_MS, DEFAULT_RECONNECT_DELAY_MS};
use crate::decoder::stream::StreamDecoder;
use crate::tic::serial::{Connector, LineReader};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::{JoinError, JoinHandle};

/// Timing of the worker loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSettings {
    /// A read yielding no complete line within this delay is retried.
    pub read_timeout: Duration,
    pub reconnect_delay: Duration,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        ReaderSettings {
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
        }
    }
}

impl From<&TicConfig> for ReaderSettings {
    fn from(config: &TicConfig) -> Self {
        ReaderSettings {
            read_timeout: config.read_timeout(),
            reconnect_delay: config.reconnect_delay(),
        }
    }
}

#[derive(Debug, Default)]
struct StopSignal {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    fn is_set(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn set(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Sleeps for `delay` unless stopped first.
    async fn cooldown(&self, delay: Duration) {
        if self.is_set() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = self.notify.notified() => {}
        }
    }
}

/// Handle on a running worker task.
#[derive(Debug)]
pub struct TicReader {
    decoder: Arc<StreamDecoder>,
    stop: Arc<StopSignal>,
    handle: JoinHandle<()>,
}

impl TicReader {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn<C>(connector: C, decoder: Arc<StreamDecoder>, settings: ReaderSettings) -> Self
    where
        C: Connector + 'static,
    {
        let stop = Arc::new(StopSignal::default());
        let handle = tokio::spawn(run(
            connector,
            Arc::clone(&decoder),
            Arc::clone(&stop),
            settings,
        ));
        TicReader {
            decoder,
            stop,
            handle,
        }
    }

    pub fn decoder(&self) -> Arc<StreamDecoder> {
        Arc::clone(&self.decoder)
    }

    /// Asks the worker to stop. It exits after the read in flight, if any.
    pub fn stop(&self) {
        if !self.stop.is_set() {
            info!("Stopping serial reader");
        }
        self.stop.set();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the worker to exit.
    pub async fn join(self) -> Result<(), JoinError> {
        self.handle.await
    }
}

async fn run<C: Connector>(
    connector: C,
    decoder: Arc<StreamDecoder>,
    stop: Arc<StopSignal>,
    settings: ReaderSettings,
) {
    let device = connector.describe();

    while !stop.is_set() {
        let port = match connector.connect().await {
            Ok(port) => port,
            Err(e) => {
                warn!("Could not open port {device}: {e}");
                stop.cooldown(settings.reconnect_delay).await;
                continue;
            }
        };
        decoder.reset();

        let mut lines = LineReader::new(port);
        while !stop.is_set() {
            match tokio::time::timeout(settings.read_timeout, lines.next_line()).await {
                Err(_) => continue,
                Ok(Ok(Some(line))) => {
                    decoder.process_line(&line);
                }
                Ok(Ok(None)) => {
                    error!(
                        "Serial device {device} closed the stream. Will retry in {:?}",
                        settings.reconnect_delay
                    );
                    break;
                }
                Ok(Err(e)) => {
                    error!(
                        "Error while reading serial device {device}: {e}. Will retry in {:?}",
                        settings.reconnect_delay
                    );
                    break;
                }
            }
        }

        decoder.mark_disconnected();
        stop.cooldown(settings.reconnect_delay).await;
    }

    debug!("Worker stop: closing the serial connection to {device}");
    decoder.mark_disconnected();
}
