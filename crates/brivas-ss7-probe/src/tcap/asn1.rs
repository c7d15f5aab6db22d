//! ASN.1 BER tag/length primitives
//!
//! Only the subset the probe walks: single-octet tags, short-form lengths,
//! the indefinite marker `0x80`, and long form with one length octet.

use crate::cursor::ByteCursor;
use crate::errors::DecodeError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Length octet marking an indefinite-length element
pub const INDEFINITE_LENGTH: u8 = 0x80;

/// Decoded BER length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Definite(usize),
    /// End signalled by a terminating tag rather than a byte count
    Indefinite,
}

impl Length {
    /// Octet count, or `None` for indefinite
    pub fn definite(&self) -> Option<usize> {
        match self {
            Self::Definite(n) => Some(*n),
            Self::Indefinite => None,
        }
    }

    /// Exclusive bound `base + len + extra`, or `frame_end` when indefinite.
    pub(crate) fn bound(&self, base: usize, extra: usize, frame_end: usize) -> usize {
        match self {
            Self::Definite(n) => base.saturating_add(*n).saturating_add(extra),
            Self::Indefinite => frame_end,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Definite(n) => write!(f, "{}", n),
            Self::Indefinite => f.write_str("indefinite"),
        }
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Definite(n) => serializer.serialize_u64(*n as u64),
            Self::Indefinite => serializer.serialize_str("indefinite"),
        }
    }
}

/// One tag/length header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagLength {
    pub tag: u8,
    pub length: Length,
    /// Absolute offset of the first value octet
    pub value_start: usize,
    /// Tag + length octets, i.e. `value_start - tag offset`
    pub header_len: usize,
}

/// Decode the length octet(s) at absolute index `idx`.
///
/// Returns the length and the number of octets beyond the first one that the
/// length occupied (0 for short form and indefinite, 1 for long form).
pub fn read_length(cur: &ByteCursor<'_>, idx: usize) -> Result<(Length, usize), DecodeError> {
    let first = cur.u8_at(idx)?;
    match first {
        INDEFINITE_LENGTH => Ok((Length::Indefinite, 0)),
        b if b > INDEFINITE_LENGTH => {
            let next = idx.checked_add(1).ok_or(DecodeError::TruncatedInput {
                offset: usize::MAX,
                bound: cur.end(),
            })?;
            Ok((Length::Definite(cur.u8_at(next)? as usize), 1))
        }
        b => Ok((Length::Definite(b as usize), 0)),
    }
}

/// Decode the tag and length at the cursor position.
pub fn read_tag_length(cur: &ByteCursor<'_>) -> Result<TagLength, DecodeError> {
    let tag = cur.peek(0)?;
    let (length, extra) = read_length(cur, cur.offset(1)?)?;
    let header_len = 2 + extra;
    Ok(TagLength {
        tag,
        length,
        value_start: cur.offset(header_len)?,
        header_len,
    })
}

/// Walk sibling elements starting with the one under the cursor and return
/// the offset of the first following element whose tag is in `targets`.
///
/// Elements with indefinite length are entered rather than skipped, so the
/// walk descends into their contents. The element under the cursor is never
/// itself matched. Returns `None` once the walk reaches `max_index`.
pub fn scan_for_tag(
    cur: ByteCursor<'_>,
    max_index: usize,
    targets: &[u8],
) -> Result<Option<usize>, DecodeError> {
    let mut cur = cur;
    loop {
        let tl = read_tag_length(&cur)?;
        let skip = tl.header_len + tl.length.definite().unwrap_or(0);
        cur = cur.advance(skip)?;
        if cur.pos() >= max_index {
            return Ok(None);
        }
        let next_tag = cur.peek(0)?;
        if targets.contains(&next_tag) {
            return Ok(Some(cur.pos()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_form_length() {
        let data = [0x30, 0x05];
        let tl = read_tag_length(&ByteCursor::new(&data)).unwrap();
        assert_eq!(tl.tag, 0x30);
        assert_eq!(tl.length, Length::Definite(5));
        assert_eq!(tl.header_len, 2);
        assert_eq!(tl.value_start, 2);
    }

    #[test]
    fn test_long_form_length() {
        let data = [0x6C, 0x81, 0xC8];
        let tl = read_tag_length(&ByteCursor::new(&data)).unwrap();
        assert_eq!(tl.length, Length::Definite(200));
        assert_eq!(tl.header_len, 3);
        assert_eq!(tl.value_start, 3);

        let (len, extra) = read_length(&ByteCursor::new(&data), 1).unwrap();
        assert_eq!(len, Length::Definite(200));
        assert_eq!(extra, 1);
    }

    #[test]
    fn test_indefinite_length_is_not_128() {
        let data = [0x6B, 0x80];
        let tl = read_tag_length(&ByteCursor::new(&data)).unwrap();
        assert_eq!(tl.length, Length::Indefinite);
        assert_eq!(tl.length.definite(), None);
        assert_eq!(tl.header_len, 2);
    }

    #[test]
    fn test_truncated_long_form() {
        let data = [0x6C, 0x81];
        assert!(matches!(
            read_tag_length(&ByteCursor::new(&data)),
            Err(DecodeError::TruncatedInput { offset: 2, bound: 2 })
        ));
        assert!(read_tag_length(&ByteCursor::new(&[0x6C])).is_err());
    }

    #[test]
    fn test_scan_finds_component_after_dialogue() {
        // dialogue portion (3 value octets), then component portion
        let data = [0x6B, 0x03, 0x28, 0x01, 0x00, 0x6C, 0x02, 0xA1, 0x00];
        let found = scan_for_tag(ByteCursor::new(&data), data.len(), &[0x6C]).unwrap();
        assert_eq!(found, Some(5));
    }

    #[test]
    fn test_scan_enters_indefinite_elements() {
        // 6B 80 | 28 02 xx xx | 6C ..
        let data = [0x6B, 0x80, 0x28, 0x02, 0x01, 0x02, 0x6C, 0x00];
        let found = scan_for_tag(ByteCursor::new(&data), data.len(), &[0x6C]).unwrap();
        assert_eq!(found, Some(6));
    }

    #[test]
    fn test_scan_stops_at_max_index() {
        let data = [0x6B, 0x03, 0x28, 0x01, 0x00, 0x6C, 0x00];
        assert_eq!(scan_for_tag(ByteCursor::new(&data), 5, &[0x6C]).unwrap(), None);
    }

    #[test]
    fn test_length_serializes_as_number_or_marker() {
        assert_eq!(serde_json::to_string(&Length::Definite(42)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&Length::Indefinite).unwrap(),
            "\"indefinite\""
        );
    }
}
