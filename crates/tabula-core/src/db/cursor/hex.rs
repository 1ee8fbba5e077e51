//! Outer text layer of continuation tokens: raw token bytes <-> hex.

use thiserror::Error as ThisError;

// Decode bound for untrusted token text (two hex chars per payload byte).
pub(crate) const MAX_TOKEN_HEX_LEN: usize = 2 * super::MAX_TOKEN_BYTES;

///
/// HexDecodeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum HexDecodeError {
    #[error("token exceeds max length: {len} hex chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("token must have an even number of hex characters")]
    OddLength,

    #[error("invalid hex character at position {position}")]
    InvalidHex { position: usize },
}

/// Render raw token bytes as lowercase hex.
#[must_use]
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(DIGITS[usize::from(byte & 0x0f)]));
    }

    out
}

/// Parse hex token text (either case) into raw bytes.
///
/// Callers trim and reject blank input before reaching this point.
/// `InvalidHex` reports the first offending byte. Every byte before it is an
/// ASCII hex digit, so the 1-based position is also its character position.
pub(crate) fn from_hex(text: &str) -> Result<Vec<u8>, HexDecodeError> {
    if text.len() > MAX_TOKEN_HEX_LEN {
        return Err(HexDecodeError::TooLong {
            len: text.len(),
            max: MAX_TOKEN_HEX_LEN,
        });
    }

    if !text.len().is_multiple_of(2) {
        return Err(HexDecodeError::OddLength);
    }

    text.as_bytes()
        .chunks_exact(2)
        .enumerate()
        .map(|(pair, chunk)| {
            let position = pair * 2;
            let hi = nibble(chunk[0]).ok_or(HexDecodeError::InvalidHex {
                position: position + 1,
            })?;
            let lo = nibble(chunk[1]).ok_or(HexDecodeError::InvalidHex {
                position: position + 2,
            })?;

            Ok((hi << 4) | lo)
        })
        .collect()
}

const fn nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

///
/// TESTS
///
