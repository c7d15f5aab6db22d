//! Bounds-checked cursor over a captured frame
//!
//! Every parser in the probe indexes the frame through a [`ByteCursor`], so
//! an offset derived from a corrupt pointer or length surfaces as
//! [`DecodeError::TruncatedInput`] instead of an out-of-range read.

use crate::errors::DecodeError;

/// Read-only view over a frame with a current position and an exclusive end.
///
/// Cursors are `Copy`: sub-decoders receive their own copy positioned by the
/// caller and hand back the position they stopped at.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ByteCursor<'a> {
    /// Cursor over the whole buffer, positioned at 0.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
        }
    }

    /// Cursor over the whole buffer, positioned at `pos`.
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos,
            end: buf.len(),
        }
    }

    /// Current position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Exclusive upper bound of valid reads.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Underlying frame.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Same frame and bound, new position. Positions past the end are
    /// allowed here; reading from them fails.
    pub fn seek(self, pos: usize) -> Self {
        Self { pos, ..self }
    }

    /// Move forward by `n` octets.
    pub fn advance(self, n: usize) -> Result<Self, DecodeError> {
        let pos = self.offset(n)?;
        Ok(self.seek(pos))
    }

    /// Narrow the readable window to `[.., end)`. Never widens it.
    pub fn limit(self, end: usize) -> Self {
        Self {
            end: end.min(self.end),
            ..self
        }
    }

    /// Absolute offset `pos + rel`, failing on arithmetic overflow.
    pub fn offset(&self, rel: usize) -> Result<usize, DecodeError> {
        self.pos.checked_add(rel).ok_or(DecodeError::TruncatedInput {
            offset: usize::MAX,
            bound: self.end,
        })
    }

    /// Octet at absolute index `idx`.
    pub fn u8_at(&self, idx: usize) -> Result<u8, DecodeError> {
        if idx >= self.end {
            return Err(self.truncated(idx));
        }
        Ok(self.buf[idx])
    }

    /// Octet at `pos + rel`.
    pub fn peek(&self, rel: usize) -> Result<u8, DecodeError> {
        self.u8_at(self.offset(rel)?)
    }

    /// Big-endian u16 at absolute index `idx`.
    pub fn u16_at(&self, idx: usize) -> Result<u16, DecodeError> {
        let b = self.slice(idx, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Big-endian u32 at absolute index `idx`.
    pub fn u32_at(&self, idx: usize) -> Result<u32, DecodeError> {
        let b = self.slice(idx, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// `len` octets starting at absolute index `start`, borrowed from the frame.
    pub fn slice(&self, start: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        let stop = start
            .checked_add(len)
            .ok_or(self.truncated(usize::MAX))?;
        if stop > self.end {
            return Err(self.truncated(start.max(self.end)));
        }
        Ok(&self.buf[start..stop])
    }

    /// Fixed-size copy of `N` octets starting at absolute index `start`.
    pub fn array_at<const N: usize>(&self, start: usize) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(start, N)?);
        Ok(out)
    }

    fn truncated(&self, offset: usize) -> DecodeError {
        DecodeError::TruncatedInput {
            offset,
            bound: self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_within_bounds() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let cur = ByteCursor::at(&data, 1);
        assert_eq!(cur.peek(0).unwrap(), 0x02);
        assert_eq!(cur.u16_at(1).unwrap(), 0x0203);
        assert_eq!(cur.u32_at(1).unwrap(), 0x0203_0405);
        assert_eq!(cur.slice(3, 2).unwrap(), &[0x04, 0x05]);
    }

    #[test]
    fn test_out_of_range_is_truncated_input() {
        let data = [0xAA; 4];
        let cur = ByteCursor::new(&data);
        assert_eq!(
            cur.u8_at(4),
            Err(DecodeError::TruncatedInput { offset: 4, bound: 4 })
        );
        assert!(matches!(cur.u32_at(1), Err(DecodeError::TruncatedInput { .. })));
        assert!(matches!(cur.slice(2, 3), Err(DecodeError::TruncatedInput { .. })));
        assert!(matches!(cur.slice(usize::MAX, 2), Err(DecodeError::TruncatedInput { .. })));
    }

    #[test]
    fn test_limit_never_widens() {
        let data = [0u8; 8];
        let cur = ByteCursor::new(&data).limit(4);
        assert_eq!(cur.end(), 4);
        assert!(cur.u8_at(4).is_err());
        assert_eq!(cur.limit(100).end(), 4);
    }

    #[test]
    fn test_advance_overflow() {
        let data = [0u8; 2];
        let cur = ByteCursor::at(&data, usize::MAX);
        assert!(cur.advance(1).is_err());
        assert_eq!(ByteCursor::new(&data).advance(5).unwrap().pos(), 5);
    }
}
