//! Decoded message and output record types

use crate::map::hex_address;
use crate::sctp::SctpChunk;
use crate::tcap::{ComponentType, Length, OperationCode, TcapMessageType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output columns, in row order
pub const RECORD_COLUMNS: [&str; 14] = [
    "timestamp",
    "packet_index",
    "chunk_index",
    "mtp3_length",
    "mtp3_msg_type",
    "called_gt",
    "calling_gt",
    "tcap_length",
    "tcap_tag",
    "operation_code",
    "component_type",
    "imsi",
    "msc",
    "vlr",
];

/// Fields extracted from one M3UA frame.
///
/// Global Titles borrow from the frame. Every field past the M3UA header is
/// `None` when the frame does not carry it or decoding stopped before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage<'a> {
    pub mtp3_length: u32,
    pub mtp3_msg_type: u8,
    pub called_global_title: Option<&'a [u8]>,
    pub calling_global_title: Option<&'a [u8]>,
    pub tcap_tag: Option<u8>,
    pub tcap_length: Option<Length>,
    pub component_type: Option<ComponentType>,
    pub operation_code: Option<OperationCode>,
    pub imsi: Option<String>,
    pub msc: Option<String>,
    pub vlr: Option<String>,
}

impl<'a> DecodedMessage<'a> {
    /// Message carrying only the M3UA header fields
    pub fn header_only(mtp3_length: u32, mtp3_msg_type: u8) -> Self {
        Self {
            mtp3_length,
            mtp3_msg_type,
            ..Self::default()
        }
    }

    /// TCAP message type, if the tag is one the probe understands
    pub fn tcap_kind(&self) -> Option<TcapMessageType> {
        self.tcap_tag.and_then(TcapMessageType::from_tag)
    }

    /// Calling GT as lowercase hex
    pub fn calling_gt_hex(&self) -> Option<String> {
        self.calling_global_title.map(hex_address)
    }

    /// Called GT as lowercase hex
    pub fn called_gt_hex(&self) -> Option<String> {
        self.called_global_title.map(hex_address)
    }

    /// Owned output row for the chunk this message came from
    pub fn to_record(&self, chunk: &SctpChunk) -> DecodedRecord {
        DecodedRecord {
            timestamp: chunk.timestamp,
            packet_index: chunk.packet_index,
            chunk_index: chunk.chunk_index,
            mtp3_length: self.mtp3_length,
            mtp3_msg_type: self.mtp3_msg_type,
            called_gt: self.called_gt_hex(),
            calling_gt: self.calling_gt_hex(),
            tcap_length: self.tcap_length,
            tcap_tag: self.tcap_tag,
            operation_code: self.operation_code.map(|op| op.value()),
            component_type: self.component_type.map(|ct| ct.tag()),
            imsi: self.imsi.clone(),
            msc: self.msc.clone(),
            vlr: self.vlr.clone(),
        }
    }
}

/// One output row; field order follows [`RECORD_COLUMNS`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedRecord {
    pub timestamp: DateTime<Utc>,
    pub packet_index: u64,
    pub chunk_index: u64,
    pub mtp3_length: u32,
    pub mtp3_msg_type: u8,
    pub called_gt: Option<String>,
    pub calling_gt: Option<String>,
    pub tcap_length: Option<Length>,
    pub tcap_tag: Option<u8>,
    pub operation_code: Option<u8>,
    pub component_type: Option<u8>,
    pub imsi: Option<String>,
    pub msc: Option<String>,
    pub vlr: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sctp::PPID_M3UA;

    #[test]
    fn test_record_columns_match_serialized_fields() {
        let msg = DecodedMessage::header_only(8, 1);
        let record = msg.to_record(&SctpChunk::new(PPID_M3UA, vec![0u8; 8]));
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), RECORD_COLUMNS.len());
        for column in RECORD_COLUMNS {
            assert!(obj.contains_key(column), "missing column {}", column);
        }
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let msg = DecodedMessage::header_only(8, 1);
        let record = msg.to_record(&SctpChunk::new(PPID_M3UA, vec![0u8; 8]));
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["imsi"].is_null());
        assert!(value["calling_gt"].is_null());
        assert!(value["operation_code"].is_null());
        assert_eq!(value["mtp3_length"], 8);
    }

    #[test]
    fn test_record_renders_gt_and_codes() {
        let called = [0x91, 0x94, 0x71, 0x00, 0x00, 0x00, 0x01];
        let msg = DecodedMessage {
            called_global_title: Some(&called),
            tcap_tag: Some(0x62),
            tcap_length: Some(Length::Indefinite),
            component_type: Some(ComponentType::Invoke),
            operation_code: Some(OperationCode::Local(2)),
            ..DecodedMessage::header_only(64, 1)
        };
        assert_eq!(msg.tcap_kind(), Some(TcapMessageType::Begin));

        let record = msg.to_record(&SctpChunk::new(PPID_M3UA, vec![0u8; 8]));
        assert_eq!(record.called_gt.as_deref(), Some("91947100000001"));
        assert_eq!(record.component_type, Some(161));
        assert_eq!(record.operation_code, Some(2));
        assert_eq!(record.tcap_tag, Some(98));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tcap_length"], "indefinite");
    }
}
