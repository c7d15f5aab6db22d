//! TCAP (Transaction Capabilities Application Part)
//!
//! ITU-T Q.773 transaction portion, walked just far enough to reach the
//! first component.

pub mod asn1;
mod components;

pub use asn1::{read_length, read_tag_length, scan_for_tag, Length, TagLength};
pub use components::{decode_component, ComponentSummary, ComponentType, OperationCode};

use crate::cursor::ByteCursor;
use crate::errors::{DecodeError, Layer};
use tracing::{debug, trace};

/// ASN.1 Tags for TCAP
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum TcapTag {
    Begin = 0x62,
    End = 0x64,
    Continue = 0x65,
    Abort = 0x67,
    DialoguePortion = 0x6B,
    ComponentPortion = 0x6C,
}

/// TCAP message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcapMessageType {
    Begin,
    End,
    Continue,
    Abort,
}

impl TcapMessageType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x62 => Some(Self::Begin),
            0x64 => Some(Self::End),
            0x65 => Some(Self::Continue),
            0x67 => Some(Self::Abort),
            _ => None,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::Begin => TcapTag::Begin as u8,
            Self::End => TcapTag::End as u8,
            Self::Continue => TcapTag::Continue as u8,
            Self::Abort => TcapTag::Abort as u8,
        }
    }

    /// Transaction IDs following the message tag. Abort is never walked.
    pub fn transaction_id_count(&self) -> usize {
        match self {
            Self::Begin | Self::End => 1,
            Self::Continue => 2,
            Self::Abort => 0,
        }
    }
}

/// Offsets of a Begin/End/Continue transaction portion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionPortion {
    pub message_type: TcapMessageType,
    pub length: Length,
    /// Offset of the tag following the last transaction ID
    pub next_tag_offset: usize,
    /// Exclusive bound for the Dialogue Portion scan
    pub scan_bound: usize,
}

/// What the probe keeps from one TCAP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcapSummary {
    pub message_type: TcapMessageType,
    pub length: Length,
    pub component: Option<ComponentSummary>,
}

/// Decode the TCAP message whose tag sits under the cursor.
///
/// Unknown message tags fail with [`DecodeError::UnrecognizedTag`]. A
/// message without a Component Portion is not an error.
pub fn decode_transaction(cur: ByteCursor<'_>) -> Result<TcapSummary, DecodeError> {
    let tag = cur.peek(0)?;
    let message_type = TcapMessageType::from_tag(tag).ok_or(DecodeError::UnrecognizedTag {
        layer: Layer::Tcap,
        tag: tag as u32,
        offset: cur.pos(),
    })?;

    if message_type == TcapMessageType::Abort {
        let (length, _) = read_length(&cur, cur.offset(1)?)?;
        return Ok(TcapSummary {
            message_type,
            length,
            component: None,
        });
    }

    let portion = transaction_portion(cur, message_type)?;
    let component = match find_component_portion(cur, &portion)? {
        Some(at) => Some(decode_component(cur.seek(at))?),
        None => {
            debug!(?message_type, "TCAP message without component portion");
            None
        }
    };

    Ok(TcapSummary {
        message_type,
        length: portion.length,
        component,
    })
}

/// Step over the TCAP length and the transaction IDs.
///
/// Layout after a long-form aware length: `tag, len, id1_tag, id1_len, id1..`
/// and, for Continue, `id2_tag, id2_len, id2..` directly behind the first.
pub fn transaction_portion(
    cur: ByteCursor<'_>,
    message_type: TcapMessageType,
) -> Result<TransactionPortion, DecodeError> {
    let (length, extra) = read_length(&cur, cur.offset(1)?)?;
    let base = cur.offset(extra)?;

    let first_len = cur.u8_at(base.saturating_add(3))? as usize;
    let next_tag_offset = if message_type.transaction_id_count() == 2 {
        let second_len = cur.u8_at(base.saturating_add(5).saturating_add(first_len))? as usize;
        base.saturating_add(6 + first_len + second_len)
    } else {
        base.saturating_add(4 + first_len)
    };

    let scan_bound = length.bound(base, 2, cur.end());
    trace!(?message_type, %length, next_tag_offset, scan_bound, "TCAP transaction portion");

    Ok(TransactionPortion {
        message_type,
        length,
        next_tag_offset,
        scan_bound,
    })
}

/// Offset of the Component Portion tag, directly after the transaction IDs
/// or behind a Dialogue Portion.
pub fn find_component_portion(
    cur: ByteCursor<'_>,
    portion: &TransactionPortion,
) -> Result<Option<usize>, DecodeError> {
    let next = portion.next_tag_offset;
    match cur.u8_at(next)? {
        t if t == TcapTag::DialoguePortion as u8 => scan_for_tag(
            cur.seek(next),
            portion.scan_bound,
            &[TcapTag::ComponentPortion as u8],
        ),
        t if t == TcapTag::ComponentPortion as u8 => Ok(Some(next)),
        _ => Ok(None),
    }
}
