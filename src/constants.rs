//! Linky TIC Protocol Constants
//!
//! Constants of the Tele-Information Client (TIC) protocol, as published by
//! Enedis in document Enedis-NOI-CPT_54E.

/// Baud rate of the historic TIC mode
pub const MODE_HISTORIC_BAUD_RATE: u32 = 1200;

/// Field separator of the historic TIC mode (space)
pub const MODE_HISTORIC_FIELD_SEPARATOR: u8 = 0x20;

/// Baud rate of the standard TIC mode
pub const MODE_STANDARD_BAUD_RATE: u32 = 9600;

/// Field separator of the standard TIC mode (horizontal tab)
pub const MODE_STANDARD_FIELD_SEPARATOR: u8 = 0x09;

/// Carriage return
pub const CR: u8 = 0x0D;

/// Line feed
pub const LF: u8 = 0x0A;

/// Start of text, opens a frame
pub const STX: u8 = 0x02;

/// End of text, closes a frame
pub const ETX: u8 = 0x03;

/// Group terminator as seen by a line reader
pub const LINE_END: &[u8] = &[CR, LF];

/// Frame terminator as seen by a line reader (end of the last group of a frame)
pub const FRAME_END: &[u8] = &[CR, ETX, STX, LF];

/// Bytes stripped from the end of a raw line before parsing
pub const TRAILING_BYTES: &[u8] = &[CR, LF, ETX, STX];

// ----------------------------------------------------------------------------
// Checksum
// ----------------------------------------------------------------------------

/// Mask keeping the low 6 bits of the group sum
pub const CHECKSUM_MASK: u32 = 0x3F;

/// Offset mapping the truncated sum into the printable range 0x20..=0x5F
pub const CHECKSUM_OFFSET: u8 = 0x20;

// ----------------------------------------------------------------------------
// Distinguished tags
// ----------------------------------------------------------------------------

/// Meter address tag in historic mode
pub const TAG_ADDRESS_HISTORIC: &str = "ADCO";

/// Meter address tag in standard mode
pub const TAG_ADDRESS_STANDARD: &str = "ADSC";

/// Status register tag (standard mode)
pub const TAG_STATUS_REGISTER: &str = "STGE";

/// Tags opening a short frame burst (tri-phase historic mode)
pub const SHORT_FRAME_DETECTION_TAGS: &[&str] = &["ADIR1", "ADIR2", "ADIR3"];

/// Tags forcing a downstream refresh while inside a short frame
pub const SHORT_FRAME_FORCED_UPDATE_TAGS: &[&str] =
    &["ADIR1", "ADIR2", "ADIR3", "IINST1", "IINST2", "IINST3"];

/// Tags always forcing a downstream refresh (single-phase overload warning)
pub const ALWAYS_FORCED_UPDATE_TAGS: &[&str] = &["ADPS"];

/// Length of a EURIDIS meter address
pub const EURIDIS_ADDRESS_LEN: usize = 12;

/// Device type codes of experimental (pilot) meters, which emit slightly different tags
pub const EXPERIMENTAL_DEVICE_TYPES: &[&str] = &["67", "68"];

// ----------------------------------------------------------------------------
// Transport defaults
// ----------------------------------------------------------------------------

/// Default serial device
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";

/// Default read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Default cooldown between two connection attempts in milliseconds
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5000;

/// Longest line kept in the read buffer before it is discarded as garbage
pub const MAX_LINE_LEN: usize = 1024;
