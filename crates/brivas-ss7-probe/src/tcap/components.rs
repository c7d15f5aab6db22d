//! TCAP Components
//!
//! Decodes the first component of a Component Portion down to its type, the
//! operation code and, for location-management operations, the IMSI, MSC and
//! VLR parameters.

use super::asn1::read_length;
use crate::cursor::ByteCursor;
use crate::errors::DecodeError;
use crate::map::{decode_imsi, hex_address, IMSI_OCTETS};
use serde::Serialize;
use tracing::trace;

/// TCAP Component Tags
#[repr(u8)]
pub enum ComponentTag {
    Invoke = 0xA1,
    ReturnResultLast = 0xA2,
    ReturnResultNotLast = 0xA3,
}

/// Parameter and operation-code tags inside a component
mod tag {
    pub const SEQUENCE: u8 = 0x30;
    pub const LOCAL_OPERATION: u8 = 0x02;
    pub const GLOBAL_OPERATION: u8 = 0x06;
    pub const IMSI_NOT_KNOWN: u8 = 0x30;
    pub const MSC_NOT_KNOWN: u8 = 0x81;
    pub const VLR_NOT_KNOWN: u8 = 0x04;
}

/// MSC/VLR address length
const ADDRESS_OCTETS: usize = 6;

/// Component type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Invoke,
    ReturnResultLast,
    ReturnResultNotLast,
    Unknown(u8),
}

impl ComponentType {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0xA1 => Self::Invoke,
            0xA2 => Self::ReturnResultLast,
            0xA3 => Self::ReturnResultNotLast,
            other => Self::Unknown(other),
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::Invoke => ComponentTag::Invoke as u8,
            Self::ReturnResultLast => ComponentTag::ReturnResultLast as u8,
            Self::ReturnResultNotLast => ComponentTag::ReturnResultNotLast as u8,
            Self::Unknown(tag) => *tag,
        }
    }

    /// Whether an operation code follows the invoke ID
    pub fn carries_operation(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

/// Operation code, local (integer) or global (object identifier) form.
/// Only the first value octet is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationCode {
    Local(u8),
    Global(u8),
}

impl OperationCode {
    pub fn value(&self) -> u8 {
        match self {
            Self::Local(v) | Self::Global(v) => *v,
        }
    }
}

/// Fields decoded from the first component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSummary {
    pub component_type: ComponentType,
    pub operation_code: Option<OperationCode>,
    pub imsi: Option<String>,
    pub msc: Option<String>,
    pub vlr: Option<String>,
    /// Exclusive bound the parameter walk ran against
    pub(crate) max_index: usize,
}

/// Decode the component whose Component Portion tag sits under the cursor.
///
/// The component bound is `index + portion_length + 2 + extra + extra2`,
/// where `index` has already been moved by both extra length octets. Long
/// form lengths therefore widen the bound by their extra octets twice.
pub fn decode_component(cur: ByteCursor<'_>) -> Result<ComponentSummary, DecodeError> {
    let mut index = cur.pos();

    let (portion_length, extra) = read_length(&cur, index.saturating_add(1))?;
    index = index.saturating_add(extra);

    let component_type = ComponentType::from_tag(cur.u8_at(index.saturating_add(2))?);
    let (_, extra2) = read_length(&cur, index.saturating_add(3))?;
    index = index.saturating_add(extra2);

    let max_index = portion_length.bound(index, 2 + extra + extra2, cur.end());

    let mut summary = ComponentSummary {
        component_type,
        operation_code: None,
        imsi: None,
        msc: None,
        vlr: None,
        max_index,
    };

    if !component_type.carries_operation() {
        trace!(tag = component_type.tag(), "component type without operation");
        return Ok(summary);
    }

    // The octet at +4 is taken as the invoke ID length; with the usual
    // `02 01 id` encoding the step lands on the operation code tag.
    let invoke_length = cur.u8_at(index.saturating_add(4))? as usize;
    let mut next = index.saturating_add(5).saturating_add(invoke_length);
    if next >= max_index {
        return Ok(summary);
    }

    let mut next_tag = cur.u8_at(next)?;
    if next_tag == tag::SEQUENCE {
        next = next.saturating_add(2);
        next_tag = cur.u8_at(next)?;
    }
    if next >= max_index {
        return Ok(summary);
    }

    let value = match next_tag {
        tag::LOCAL_OPERATION => OperationCode::Local(cur.u8_at(next.saturating_add(2))?),
        tag::GLOBAL_OPERATION => OperationCode::Global(cur.u8_at(next.saturating_add(2))?),
        _ => return Ok(summary),
    };
    summary.operation_code = Some(value);
    next = next.saturating_add(3);

    decode_parameters(&cur, next, &mut summary)?;
    trace!(
        ?component_type,
        operation = value.value(),
        imsi = summary.imsi.is_some(),
        msc = summary.msc.is_some(),
        vlr = summary.vlr.is_some(),
        "component decoded"
    );
    Ok(summary)
}

/// Walk IMSI, MSC and VLR in source order. Anything else, or a length that
/// does not match, ends the walk.
fn decode_parameters(
    cur: &ByteCursor<'_>,
    mut next: usize,
    summary: &mut ComponentSummary,
) -> Result<(), DecodeError> {
    while next < summary.max_index {
        match cur.u8_at(next)? {
            tag::IMSI_NOT_KNOWN => {
                // sequence header, then octet string tag and length
                if cur.u8_at(next.saturating_add(3))? as usize != IMSI_OCTETS {
                    break;
                }
                let octets = cur.array_at::<IMSI_OCTETS>(next.saturating_add(4))?;
                summary.imsi = Some(decode_imsi(&octets));
                next = next.saturating_add(4 + IMSI_OCTETS);
            }
            tag::MSC_NOT_KNOWN => {
                if cur.u8_at(next.saturating_add(1))? as usize != ADDRESS_OCTETS {
                    break;
                }
                summary.msc = Some(hex_address(cur.slice(next.saturating_add(2), ADDRESS_OCTETS)?));
                next = next.saturating_add(2 + ADDRESS_OCTETS);
            }
            tag::VLR_NOT_KNOWN => {
                if cur.u8_at(next.saturating_add(1))? as usize == ADDRESS_OCTETS {
                    summary.vlr = Some(hex_address(cur.slice(next.saturating_add(2), ADDRESS_OCTETS)?));
                }
                break;
            }
            _ => break,
        }
    }
    Ok(())
}
