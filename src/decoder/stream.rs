//! # Stream Decoder
//!
//! The stateful half of the TIC decoder. Lines read from the serial port are
//! fed one by one to [`StreamDecoder::process_line`], which parses them, keeps
//! the value cache up to date, tracks frame boundaries and notifies consumers.
//!
//! ## Connection states
//!
//! ```text
//!                reset()                  first line
//! Disconnected ----------> AwaitingFirstLine ----------> Streaming
//!      ^                                                     |
//!      +--------------- mark_disconnected() -----------------+
//! ```
//!
//! The first line after a (re)connection is always discarded as it is most
//! likely truncated. Frame end markers are honoured on every line, including
//! the discarded one.
//!
//! ## Usage
//!
//! ```rust
//! use linky_tic::decoder::{DecoderOptions, StreamDecoder};
//! use linky_tic::tic::TicMode;
//!
//! let decoder = StreamDecoder::new(DecoderOptions::new(TicMode::Historic));
//! decoder.reset();
//! decoder.process_line(b"678901 E\r\n");
//! decoder.process_line(b"ADCO 012345678901 E\r\x03\x02\n");
//!
//! let (value, timestamp) = decoder.get_value("ADCO");
//! assert_eq!(value.as_deref(), Some("012345678901"));
//! assert_eq!(timestamp, None);
//! assert_eq!(decoder.frames_read(), 0);
//! ```

use crate::config::TicConfig;
use crate::constants::{
    ALWAYS_FORCED_UPDATE_TAGS, SHORT_FRAME_DETECTION_TAGS, SHORT_FRAME_FORCED_UPDATE_TAGS,
    TAG_STATUS_REGISTER,
};
use crate::decoder::cache::{CachedValue, FrameCache, FrameEnd};
use crate::decoder::notify::{PushKind, PushNotification, PushRegistry};
use crate::error::TicError;
use crate::identity::{decode_address, DeviceIdentity};
use crate::log_error_throttled;
use crate::logging::{log_line_hex, LogThrottle};
use crate::status_register::{get_status, StatusRegisterField, StatusValue};
use crate::tic::group::{contains_frame_end, parse_group, printable, Group};
use crate::tic::mode::TicMode;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Connection state of a decoding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    AwaitingFirstLine,
    Streaming,
}

/// Result of feeding one line to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The decoder is disconnected; the line was ignored.
    NotConnected,
    /// First line after a reset, dropped unparsed.
    FirstLineDiscarded,
    /// Nothing left once line terminators are stripped.
    Empty,
    /// A valid group; holds its tag.
    Accepted(String),
    /// Parse or checksum failure, logged and skipped.
    Rejected,
}

/// Decoding options of one meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    pub mode: TicMode,
    pub three_phase: bool,
    pub producer: bool,
    pub realtime: bool,
}

impl DecoderOptions {
    pub fn new(mode: TicMode) -> Self {
        DecoderOptions {
            mode,
            three_phase: false,
            producer: false,
            realtime: false,
        }
    }

    pub fn three_phase(mut self, three_phase: bool) -> Self {
        self.three_phase = three_phase;
        self
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Producer mode only exists in standard mode.
    pub fn producer(mut self, producer: bool) -> Self {
        self.producer = producer && self.mode == TicMode::Standard;
        self
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self::new(TicMode::Historic)
    }
}

impl From<&TicConfig> for DecoderOptions {
    fn from(config: &TicConfig) -> Self {
        DecoderOptions::new(config.mode)
            .three_phase(config.three_phase)
            .producer(config.producer)
            .realtime(config.realtime)
    }
}

/// Decoding counters, kept across reconnections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecoderStats {
    pub lines: u64,
    pub groups: u64,
    pub parse_errors: u64,
    pub checksum_errors: u64,
    pub regular_frames: u64,
    pub short_frames: u64,
    pub connections: u64,
    pub disconnections: u64,
}

/// Serializable view of a decoder at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct DecoderSnapshot {
    pub state: ConnectionState,
    pub mode: TicMode,
    pub frames_read: i64,
    pub has_read_full_frame: bool,
    pub within_short_frame: bool,
    pub serial_number: Option<String>,
    pub identity: DeviceIdentity,
    pub values: BTreeMap<String, CachedValue>,
    pub stats: DecoderStats,
}

/// Everything invalidated by a reset.
#[derive(Debug)]
struct SessionState {
    connection: ConnectionState,
    cache: FrameCache,
    identity: Option<DeviceIdentity>,
    serial_number: Option<String>,
    stats: DecoderStats,
    throttle: LogThrottle,
}

impl SessionState {
    fn new(connection: ConnectionState) -> Self {
        SessionState {
            connection,
            cache: FrameCache::new(),
            identity: None,
            serial_number: None,
            stats: DecoderStats::default(),
            throttle: LogThrottle::default(),
        }
    }

    /// Fresh session carrying over the counters and log throttle.
    fn renew(&mut self, connection: ConnectionState) {
        let mut next = SessionState::new(connection);
        std::mem::swap(&mut next.stats, &mut self.stats);
        std::mem::swap(&mut next.throttle, &mut self.throttle);
        *self = next;
    }
}

/// Stateful decoder of one meter's line stream.
///
/// Shared between the worker feeding it and any number of readers, usually
/// behind an `Arc`.
#[derive(Debug)]
pub struct StreamDecoder {
    mode: TicMode,
    three_phase: bool,
    producer: bool,
    realtime: AtomicBool,
    state: RwLock<SessionState>,
    pushes: PushRegistry,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new(DecoderOptions::default())
    }
}

impl StreamDecoder {
    /// Creates a decoder in the `Disconnected` state.
    pub fn new(options: DecoderOptions) -> Self {
        StreamDecoder {
            mode: options.mode,
            three_phase: options.three_phase,
            producer: options.producer,
            realtime: AtomicBool::new(options.realtime),
            state: RwLock::new(SessionState::new(ConnectionState::Disconnected)),
            pushes: PushRegistry::new(),
        }
    }

    pub fn shared(options: DecoderOptions) -> Arc<Self> {
        Arc::new(Self::new(options))
    }

    pub fn mode(&self) -> TicMode {
        self.mode
    }

    pub fn options(&self) -> DecoderOptions {
        DecoderOptions {
            mode: self.mode,
            three_phase: self.three_phase,
            producer: self.producer,
            realtime: self.realtime(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Starts a new session after the port was (re)opened.
    ///
    /// Every registered callback is told its value is unavailable.
    pub fn reset(&self) {
        debug!("Resetting decoder state");
        {
            let mut state = self.write();
            state.renew(ConnectionState::AwaitingFirstLine);
            state.stats.connections += 1;
        }
        self.pushes.broadcast(PushKind::Unavailable, self.realtime());
    }

    /// Drops the session after a transport failure or a stop.
    pub fn mark_disconnected(&self) {
        {
            let mut state = self.write();
            if state.connection == ConnectionState::Disconnected {
                return;
            }
            state.renew(ConnectionState::Disconnected);
            state.stats.disconnections += 1;
        }
        info!("Decoder disconnected, cached values dropped");
        self.pushes.broadcast(PushKind::Unavailable, self.realtime());
    }

    /// Updates the realtime option at runtime.
    pub fn set_realtime(&self, realtime: bool) {
        debug!("New real time option value: {realtime}");
        self.realtime.store(realtime, Ordering::SeqCst);
    }

    pub fn realtime(&self) -> bool {
        self.realtime.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // Line processing
    // ------------------------------------------------------------------

    /// Feeds one raw line, terminator included.
    pub fn process_line(&self, raw: &[u8]) -> LineOutcome {
        let realtime = self.realtime();
        let mut pending = Vec::new();

        let outcome = {
            let mut state = self.write();
            let outcome = match state.connection {
                ConnectionState::Disconnected => return LineOutcome::NotConnected,
                ConnectionState::AwaitingFirstLine => {
                    debug!("Skipping first line: {}", printable(raw));
                    state.stats.lines += 1;
                    state.connection = ConnectionState::Streaming;
                    LineOutcome::FirstLineDiscarded
                }
                ConnectionState::Streaming => {
                    state.stats.lines += 1;
                    self.decode_line(&mut state, raw, realtime, &mut pending)
                }
            };

            if contains_frame_end(raw) {
                self.end_frame(&mut state, realtime, &mut pending);
                if let LineOutcome::Accepted(tag) = &outcome {
                    debug!("End of frame, last tag read: {tag}");
                }
            }
            outcome
        };

        self.pushes.dispatch(pending);
        outcome
    }

    fn decode_line(
        &self,
        state: &mut SessionState,
        raw: &[u8],
        realtime: bool,
        pending: &mut Vec<PushNotification>,
    ) -> LineOutcome {
        debug!("Line to parse: {}", printable(raw));
        match parse_group(raw, self.mode) {
            Ok(None) => LineOutcome::Empty,
            Ok(Some(group)) => {
                let tag = self.accept_group(state, group);
                pending.push(PushNotification::updated(
                    &tag,
                    self.force_refresh(state, &tag, realtime),
                ));
                LineOutcome::Accepted(tag)
            }
            Err(e) => {
                self.reject_line(state, raw, &e);
                LineOutcome::Rejected
            }
        }
    }

    fn accept_group(&self, state: &mut SessionState, group: Group) -> String {
        state.stats.groups += 1;
        let Group {
            tag,
            timestamp,
            value,
        } = group;
        debug!("Read the following values: {tag} -> {value:?} ({timestamp:?})");

        if tag == self.mode.address_tag() {
            Self::decode_identity(state, &value);
        }
        state.cache.upsert(&tag, value, timestamp);

        if self.handles_short_frame_entry(state, &tag) {
            warn!("Short frame burst detected ({tag}): switching to forced update mode");
            state.cache.enter_short_frame();
        }
        tag
    }

    fn handles_short_frame_entry(&self, state: &SessionState, tag: &str) -> bool {
        self.mode == TicMode::Historic
            && self.three_phase
            && !state.cache.within_short_frame()
            && SHORT_FRAME_DETECTION_TAGS.contains(&tag)
    }

    fn force_refresh(&self, state: &SessionState, tag: &str, realtime: bool) -> bool {
        realtime
            || ALWAYS_FORCED_UPDATE_TAGS.contains(&tag)
            || (state.cache.within_short_frame() && SHORT_FRAME_FORCED_UPDATE_TAGS.contains(&tag))
    }

    fn decode_identity(state: &mut SessionState, address: &str) {
        // The address identifies the meter: decode it once per session.
        if state.identity.is_some() {
            return;
        }
        match decode_address(address) {
            Ok(identity) => {
                info!(
                    "Meter identified: {} ({})",
                    address,
                    identity.device_type.unwrap_or("unknown device type")
                );
                state.serial_number = Some(address.to_string());
                state.identity = Some(identity);
            }
            Err(e) => error!("Cannot parse meter address: {e}"),
        }
    }

    fn reject_line(&self, state: &mut SessionState, raw: &[u8], e: &TicError) {
        match e {
            TicError::InvalidChecksum(_) => state.stats.checksum_errors += 1,
            _ => state.stats.parse_errors += 1,
        }
        if !raw.is_ascii() {
            log_line_hex("Non ASCII line", raw);
        }
        log_error_throttled!(state.throttle, "{} mode: {e}", self.mode);
    }

    fn end_frame(
        &self,
        state: &mut SessionState,
        realtime: bool,
        pending: &mut Vec<PushNotification>,
    ) {
        match state.cache.end_frame() {
            FrameEnd::Short => {
                debug!("End of short frame");
                state.stats.short_frames += 1;
            }
            FrameEnd::Regular { evicted } => {
                state.stats.regular_frames += 1;
                for tag in evicted {
                    debug!(
                        "Tag {tag} was present in cache but has not been seen in previous frame: removing from cache"
                    );
                    pending.push(PushNotification::evicted(tag, realtime));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Value and timestamp of `tag`, or a null pair when unknown or disconnected.
    pub fn get_value(&self, tag: &str) -> (Option<String>, Option<String>) {
        match self.value(tag) {
            Some(CachedValue { value, timestamp }) => (Some(value), timestamp),
            None => (None, None),
        }
    }

    pub fn value(&self, tag: &str) -> Option<CachedValue> {
        let state = self.read();
        if state.connection == ConnectionState::Disconnected {
            return None;
        }
        state.cache.get(tag).cloned()
    }

    pub fn state(&self) -> ConnectionState {
        self.read().connection
    }

    pub fn is_connected(&self) -> bool {
        self.state() != ConnectionState::Disconnected
    }

    pub fn frames_read(&self) -> i64 {
        self.read().cache.frames_read()
    }

    pub fn has_read_full_frame(&self) -> bool {
        self.read().cache.has_read_full_frame()
    }

    pub fn within_short_frame(&self) -> bool {
        self.read().cache.within_short_frame()
    }

    /// Meter identity; every field is `None` until the address group is decoded.
    pub fn device_identity(&self) -> DeviceIdentity {
        self.read().identity.clone().unwrap_or_default()
    }

    /// Raw meter address, once decoded.
    pub fn serial_number(&self) -> Option<String> {
        self.read().serial_number.clone()
    }

    /// Decodes one field of the cached status register.
    ///
    /// `None` when no status register was received.
    pub fn status_register(
        &self,
        field: StatusRegisterField,
    ) -> Option<Result<StatusValue, TicError>> {
        let (value, _) = self.get_value(TAG_STATUS_REGISTER);
        value.map(|v| get_status(&v, field))
    }

    pub fn stats(&self) -> DecoderStats {
        self.read().stats.clone()
    }

    pub fn snapshot(&self) -> DecoderSnapshot {
        let state = self.read();
        let connected = state.connection != ConnectionState::Disconnected;
        DecoderSnapshot {
            state: state.connection,
            mode: self.mode,
            frames_read: state.cache.frames_read(),
            has_read_full_frame: state.cache.has_read_full_frame(),
            within_short_frame: state.cache.within_short_frame(),
            serial_number: state.serial_number.clone(),
            identity: state.identity.clone().unwrap_or_default(),
            values: if connected {
                state.cache.entries()
            } else {
                BTreeMap::new()
            },
            stats: state.stats.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Push notifications
    // ------------------------------------------------------------------

    /// Registers the callback of `tag`, replacing any previous one.
    pub fn register_push_notification<F>(&self, tag: &str, callback: F)
    where
        F: Fn(PushNotification) + Send + Sync + 'static,
    {
        self.pushes.register(tag, Arc::new(callback));
    }

    /// Returns `true` if a callback was registered for `tag`.
    pub fn unregister_push_notification(&self, tag: &str) -> bool {
        self.pushes.unregister(tag).is_some()
    }
}
