//! # TIC Stream Decoding
//!
//! Stateful decoding of a meter's line stream: value cache, frame tracking,
//! push notifications and the worker task driving it all from a serial port.

pub mod cache;
pub mod notify;
pub mod reader;
pub mod stream;

pub use cache::{CachedValue, FrameCache, FrameEnd};
pub use notify::{PushCallback, PushKind, PushNotification, PushRegistry};
pub use reader::{ReaderSettings, TicReader};
pub use stream::{
    ConnectionState, DecoderOptions, DecoderSnapshot, DecoderStats, LineOutcome, StreamDecoder,
};
