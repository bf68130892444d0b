//! # TIC Group Checksum
//!
//! Every group carries a one byte checksum computed over the bytes preceding it:
//!
//! ```text
//! historic: TAG SP VALUE                 (separator before the checksum excluded)
//! standard: TAG HT [TIMESTAMP HT] VALUE HT (separator before the checksum included)
//! checksum = (sum of bytes & 0x3F) + 0x20
//! ```
//!
//! The result always lies in the printable range `0x20..=0x5F`.

use crate::constants::{CHECKSUM_MASK, CHECKSUM_OFFSET};
use crate::error::{ChecksumMismatch, TicError};
use crate::tic::mode::TicMode;

/// Rebuilds the exact byte sequence covered by the checksum of a group.
pub fn checksummed_bytes(
    mode: TicMode,
    tag: &[u8],
    timestamp: Option<&[u8]>,
    value: &[u8],
) -> Vec<u8> {
    let sep = mode.separator();
    let mut frame = Vec::with_capacity(tag.len() + value.len() + 20);
    frame.extend_from_slice(tag);
    frame.push(sep);
    match mode {
        TicMode::Historic => {
            frame.extend_from_slice(value);
        }
        TicMode::Standard => {
            if let Some(ts) = timestamp {
                frame.extend_from_slice(ts);
                frame.push(sep);
            }
            frame.extend_from_slice(value);
            frame.push(sep);
        }
    }
    frame
}

/// Sum of every byte, as an unsigned integer.
pub fn raw_sum(frame: &[u8]) -> u32 {
    frame.iter().map(|&b| u32::from(b)).sum()
}

/// Computes the checksum byte of an already rebuilt group.
pub fn compute(frame: &[u8]) -> u8 {
    truncate(raw_sum(frame)) + CHECKSUM_OFFSET
}

fn truncate(sum: u32) -> u8 {
    (sum & CHECKSUM_MASK) as u8
}

/// Validates the checksum of a group against the byte read on the wire.
pub fn validate(
    mode: TicMode,
    tag: &[u8],
    timestamp: Option<&[u8]>,
    value: &[u8],
    expected: u8,
) -> Result<(), TicError> {
    let frame = checksummed_bytes(mode, tag, timestamp, value);
    let sum = raw_sum(&frame);
    let truncated = truncate(sum);
    let computed = truncated + CHECKSUM_OFFSET;
    if computed != expected {
        return Err(ChecksumMismatch {
            tag: ascii_or_placeholder(tag),
            timestamp: timestamp.map(ascii_or_placeholder),
            value: ascii_or_placeholder(value),
            sum,
            truncated,
            computed,
            expected,
        }
        .into());
    }
    Ok(())
}

fn ascii_or_placeholder(bytes: &[u8]) -> String {
    if bytes.is_ascii() {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        "<invalid ascii sequence>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_historic_checksum() {
        let frame = checksummed_bytes(TicMode::Historic, b"ADCO", None, b"012345678901");
        assert_eq!(frame, b"ADCO 012345678901");
        assert_eq!(compute(&frame), b'E');
    }

    #[test]
    fn test_historic_ignores_timestamp() {
        let frame = checksummed_bytes(TicMode::Historic, b"PAPP", Some(b"H081225223518"), b"00390");
        assert_eq!(frame, b"PAPP 00390");
    }

    #[test]
    fn test_standard_checksum_includes_trailing_separator() {
        let frame = checksummed_bytes(TicMode::Standard, b"SINSTS", None, b"00390");
        assert_eq!(frame, b"SINSTS\t00390\t");
        assert_eq!(compute(&frame), b'R');
    }

    #[test]
    fn test_standard_checksum_with_timestamp() {
        let frame =
            checksummed_bytes(TicMode::Standard, b"SMAXSN", Some(b"H081225064300"), b"01200");
        assert_eq!(frame, b"SMAXSN\tH081225064300\t01200\t");
        assert_eq!(compute(&frame), b'/');
    }

    #[test]
    fn test_validate_mismatch_carries_diagnostics() {
        let err = validate(TicMode::Historic, b"ADCO", None, b"012345678901", b'X').unwrap_err();
        match err {
            TicError::InvalidChecksum(m) => {
                assert_eq!(m.tag, "ADCO");
                assert_eq!(m.value, "012345678901");
                assert_eq!(m.timestamp, None);
                assert_eq!(m.computed, b'E');
                assert_eq!(m.expected, b'X');
                assert_eq!(m.truncated + 0x20, m.computed);
                assert_eq!(m.sum & 0x3F, u32::from(m.truncated));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_checksum_range() {
        for b in 0u8..=0x7F {
            let c = compute(&[b]);
            assert!((0x20..=0x5F).contains(&c));
        }
    }
}
