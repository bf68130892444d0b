//! # TIC Group Parser
//!
//! A group is one `TAG SEP [TIMESTAMP SEP] VALUE SEP CHECKSUM` unit, transmitted
//! as one physical line. This module turns a raw line, as returned by a line
//! reader, into a validated [`Group`].
//!
//! ## Usage
//!
//! ```rust
//! use linky_tic::tic::{parse_group, TicMode};
//!
//! let group = parse_group(b"ADCO 012345678901 E\r\n", TicMode::Historic)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(group.tag, "ADCO");
//! assert_eq!(group.value, "012345678901");
//! assert_eq!(group.timestamp, None);
//! ```

use crate::constants::{FRAME_END, TRAILING_BYTES};
use crate::error::TicError;
use crate::tic::checksum;
use crate::tic::horodate::Horodate;
use crate::tic::mode::TicMode;
use serde::Serialize;

/// One decoded and validated TIC group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub tag: String,
    pub timestamp: Option<String>,
    pub value: String,
}

impl Group {
    /// Decodes the horodate of the group, if it carries one.
    pub fn horodate(&self) -> Option<Result<Horodate, TicError>> {
        self.timestamp.as_deref().map(Horodate::parse)
    }
}

/// Raw fields of a line, before checksum validation.
struct RawFields<'a> {
    tag: &'a [u8],
    timestamp: Option<&'a [u8]>,
    value: &'a [u8],
    checksum: u8,
}

/// Removes every trailing line end and frame end byte.
pub fn strip_line_end(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .rposition(|b| !TRAILING_BYTES.contains(b))
        .map_or(0, |pos| pos + 1);
    &raw[..end]
}

/// True when the line closes a frame.
pub fn contains_frame_end(raw: &[u8]) -> bool {
    raw.windows(FRAME_END.len()).any(|w| w == FRAME_END)
}

/// Escaped rendering of a raw line for log and error messages.
pub fn printable(raw: &[u8]) -> String {
    raw.escape_ascii().to_string()
}

/// Parses and validates one raw line.
///
/// Returns `Ok(None)` when the line holds nothing once its terminators are
/// stripped (a bare frame end marker for instance).
pub fn parse_group(raw: &[u8], mode: TicMode) -> Result<Option<Group>, TicError> {
    let line = strip_line_end(raw);
    if line.is_empty() {
        return Ok(None);
    }

    let fields = split_fields(line, mode)?;
    if fields.tag.is_empty() {
        return Err(TicError::EmptyTag(printable(line)));
    }
    if fields.value.is_empty() && fields.timestamp.is_none() {
        return Err(TicError::EmptyValue(printable(line)));
    }

    checksum::validate(
        mode,
        fields.tag,
        fields.timestamp,
        fields.value,
        fields.checksum,
    )?;

    Ok(Some(Group {
        tag: ascii_field(fields.tag, "tag", line)?,
        timestamp: fields
            .timestamp
            .map(|ts| ascii_field(ts, "timestamp", line))
            .transpose()?,
        value: ascii_field(fields.value, "value", line)?,
    }))
}

fn split_fields(line: &[u8], mode: TicMode) -> Result<RawFields<'_>, TicError> {
    let sep = mode.separator();
    let fields: Vec<&[u8]> = line.split(|&b| b == sep).collect();

    match (mode, fields.as_slice()) {
        (TicMode::Standard, [tag, timestamp, value, cs]) => Ok(RawFields {
            tag: *tag,
            timestamp: Some(*timestamp),
            value: *value,
            checksum: checksum_byte(cs, line)?,
        }),
        (TicMode::Standard, [tag, value, cs]) | (TicMode::Historic, [tag, value, cs]) => {
            Ok(RawFields {
                tag: *tag,
                timestamp: None,
                value: *value,
                checksum: checksum_byte(cs, line)?,
            })
        }
        // The checksum byte equals the separator: the split yields two empty trailing fields.
        (TicMode::Historic, [tag, value, a, b]) if a.is_empty() && b.is_empty() => Ok(RawFields {
            tag: *tag,
            timestamp: None,
            value: *value,
            checksum: sep,
        }),
        _ => Err(TicError::FieldCount {
            mode: mode.name(),
            fields: fields.len(),
            line: printable(line),
        }),
    }
}

fn checksum_byte(field: &[u8], line: &[u8]) -> Result<u8, TicError> {
    match field {
        [cs] => Ok(*cs),
        _ => Err(TicError::MalformedChecksum {
            checksum: printable(field),
            line: printable(line),
        }),
    }
}

fn ascii_field(bytes: &[u8], field: &'static str, line: &[u8]) -> Result<String, TicError> {
    if !bytes.is_ascii() {
        return Err(TicError::NonAscii {
            field,
            line: printable(line),
        });
    }
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_end() {
        assert_eq!(strip_line_end(b"PAPP 00390 -\r\n"), b"PAPP 00390 -");
        assert_eq!(strip_line_end(b"PAPP 00390 -\r\x03\x02\n"), b"PAPP 00390 -");
        assert_eq!(strip_line_end(b"\r\x03\x02\n"), b"");
        assert_eq!(strip_line_end(b"IINST 009  \r\n"), b"IINST 009  ");
    }

    #[test]
    fn test_contains_frame_end() {
        assert!(contains_frame_end(b"MOTDETAT 000000 B\r\x03\x02\n"));
        assert!(!contains_frame_end(b"MOTDETAT 000000 B\r\n"));
    }

    #[test]
    fn test_historic_four_fields_need_empty_tail() {
        let err = parse_group(b"ADCO 0123 4567 E\r\n", TicMode::Historic).unwrap_err();
        assert!(matches!(err, TicError::FieldCount { fields: 4, .. }));
    }

    #[test]
    fn test_malformed_checksum() {
        let err = parse_group(b"ADCO 012345678901 EE\r\n", TicMode::Historic).unwrap_err();
        assert!(matches!(err, TicError::MalformedChecksum { .. }));
        let err = parse_group(b"SINSTS\t00390\t\r\n", TicMode::Standard).unwrap_err();
        assert!(matches!(err, TicError::MalformedChecksum { .. }));
    }
}
