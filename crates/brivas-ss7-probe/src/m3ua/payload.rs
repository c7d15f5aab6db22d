//! Payload Data parameter walk

use super::ParameterTag;
use crate::cursor::ByteCursor;
use crate::errors::{DecodeError, Layer};
use tracing::trace;

/// Smallest legal parameter: tag + length, no value
const PARAMETER_HEADER_LEN: usize = 4;

/// Locate the mandatory Protocol Data parameter.
///
/// `cur` sits on the first parameter (offset 8 of the message). Network
/// Appearance, Routing Context and Correlation Id are skipped by their
/// declared length, which already counts the 4 header octets. Returns the
/// absolute offset of the Protocol Data tag.
///
/// Any other tag stops the walk with [`DecodeError::UnrecognizedTag`].
pub fn find_protocol_data(cur: ByteCursor<'_>) -> Result<usize, DecodeError> {
    let mut cur = cur;
    loop {
        let at = cur.pos();
        let raw = cur.u16_at(at)?;
        let tag = ParameterTag::from_u16(raw).ok_or(DecodeError::UnrecognizedTag {
            layer: Layer::M3ua,
            tag: raw as u32,
            offset: at,
        })?;

        if tag == ParameterTag::ProtocolData {
            trace!(offset = at, "M3UA protocol data found");
            return Ok(at);
        }

        let length = cur.u16_at(cur.offset(2)?)? as usize;
        if length < PARAMETER_HEADER_LEN {
            return Err(DecodeError::InvalidLength {
                layer: Layer::M3ua,
                offset: at,
                length,
            });
        }
        trace!(?tag, offset = at, length, "skipping M3UA parameter");
        cur = cur.advance(length)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(tag: u16, value: &[u8]) -> Vec<u8> {
        let mut out = tag.to_be_bytes().to_vec();
        out.extend_from_slice(&((value.len() + 4) as u16).to_be_bytes());
        out.extend_from_slice(value);
        out
    }

    #[test]
    fn test_protocol_data_first() {
        let mut data = vec![0u8; 8];
        data.extend(param(0x0210, &[0; 12]));
        assert_eq!(find_protocol_data(ByteCursor::at(&data, 8)).unwrap(), 8);
    }

    #[test]
    fn test_skips_optional_parameters() {
        let mut data = vec![0u8; 8];
        data.extend(param(0x0200, &[0, 0, 0, 1]));
        data.extend(param(0x0006, &[0, 0, 0, 7]));
        data.extend(param(0x0210, &[0; 12]));
        assert_eq!(find_protocol_data(ByteCursor::at(&data, 8)).unwrap(), 24);
    }

    #[test]
    fn test_unknown_parameter_stops_walk() {
        let mut data = vec![0u8; 8];
        data.extend(param(0x0004, b"info"));
        assert_eq!(
            find_protocol_data(ByteCursor::at(&data, 8)),
            Err(DecodeError::UnrecognizedTag {
                layer: Layer::M3ua,
                tag: 4,
                offset: 8
            })
        );
    }

    #[test]
    fn test_exhausted_before_protocol_data() {
        let mut data = vec![0u8; 8];
        data.extend(param(0x0006, &[0, 0, 0, 7]));
        assert!(matches!(
            find_protocol_data(ByteCursor::at(&data, 8)),
            Err(DecodeError::TruncatedInput { offset: 16, .. })
        ));
    }

    #[test]
    fn test_zero_length_parameter_rejected() {
        let mut data = vec![0u8; 8];
        data.extend([0x00, 0x06, 0x00, 0x00]);
        assert!(matches!(
            find_protocol_data(ByteCursor::at(&data, 8)),
            Err(DecodeError::InvalidLength { length: 0, .. })
        ));
    }
}
