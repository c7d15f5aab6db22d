//! M3UA (MTP3 User Adaptation Layer)
//!
//! RFC 4666 framing, read-only: the common header and the parameter walk
//! of a Payload Data (DATA) message.

mod payload;

pub use payload::find_protocol_data;

use crate::cursor::ByteCursor;
use crate::errors::DecodeError;

/// M3UA common header length
pub const HEADER_LEN: usize = 8;

/// Message type of Payload Data within the Transfer class
pub const PAYLOAD_DATA: u8 = 1;

/// Octets from the Protocol Data tag to the first SCCP octet:
/// tag, length, OPC, DPC, SI, NI, MP, SLS.
pub const PROTOCOL_DATA_USER_OFFSET: usize = 16;

/// M3UA Message Class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageClass {
    Management = 0,
    Transfer = 1,
    Ssnm = 2,      // SS7 Signaling Network Management
    Aspsm = 3,     // ASP State Maintenance
    Asptm = 4,     // ASP Traffic Maintenance
    Rkm = 9,       // Routing Key Management
}

impl MessageClass {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Management),
            1 => Some(Self::Transfer),
            2 => Some(Self::Ssnm),
            3 => Some(Self::Aspsm),
            4 => Some(Self::Asptm),
            9 => Some(Self::Rkm),
            _ => None,
        }
    }
}

/// Parameter tags that may appear in a Payload Data message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ParameterTag {
    RoutingContext = 0x0006,
    CorrelationId = 0x0013,
    NetworkAppearance = 0x0200,
    ProtocolData = 0x0210,
}

impl ParameterTag {
    pub fn from_u16(v: u16) -> Option<Self> {
        match v {
            0x0006 => Some(Self::RoutingContext),
            0x0013 => Some(Self::CorrelationId),
            0x0200 => Some(Self::NetworkAppearance),
            0x0210 => Some(Self::ProtocolData),
            _ => None,
        }
    }
}

/// M3UA common header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    pub version: u8,
    pub message_class: u8,
    pub message_type: u8,
    /// Total message length including this header
    pub length: u32,
}

impl CommonHeader {
    /// Parse the 8-octet header at the cursor position.
    pub fn parse(cur: &ByteCursor<'_>) -> Result<Self, DecodeError> {
        let start = cur.pos();
        Ok(Self {
            version: cur.u8_at(start)?,
            message_class: cur.u8_at(cur.offset(2)?)?,
            message_type: cur.u8_at(cur.offset(3)?)?,
            length: cur.u32_at(cur.offset(4)?)?,
        })
    }

    /// Whether anything follows the header
    pub fn has_body(&self) -> bool {
        self.length as usize > HEADER_LEN
    }

    /// Transfer class, Payload Data type
    pub fn is_payload_data(&self) -> bool {
        MessageClass::from_u8(self.message_class) == Some(MessageClass::Transfer)
            && self.message_type == PAYLOAD_DATA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_header() {
        let data = [0x01, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x40];
        let hdr = CommonHeader::parse(&ByteCursor::new(&data)).unwrap();
        assert_eq!(hdr.version, 1);
        assert_eq!(hdr.length, 64);
        assert!(hdr.has_body());
        assert!(hdr.is_payload_data());
    }

    #[test]
    fn test_header_only_and_other_classes() {
        let data = [0x01, 0x00, 0x03, 0x01, 0x00, 0x00, 0x00, 0x08];
        let hdr = CommonHeader::parse(&ByteCursor::new(&data)).unwrap();
        assert!(!hdr.has_body());
        assert!(!hdr.is_payload_data());
        assert_eq!(MessageClass::from_u8(hdr.message_class), Some(MessageClass::Aspsm));
    }

    #[test]
    fn test_short_header_is_truncated() {
        let data = [0x01, 0x00, 0x01, 0x01, 0x00];
        assert!(matches!(
            CommonHeader::parse(&ByteCursor::new(&data)),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }
}
