//! SCCP Called/Calling address resolution

use crate::cursor::ByteCursor;
use crate::errors::DecodeError;
use tracing::trace;

/// Position of the pointer to the Called Party Address
const CALLED_POINTER: usize = 2;
/// Position of the pointer to the Calling Party Address
const CALLING_POINTER: usize = 3;
/// Position of the pointer to the Data parameter (TCAP)
const DATA_POINTER: usize = 4;

/// Octets between the address length octet and the Global Title
const GT_OFFSET: usize = 3;

/// Addressing extracted from one SCCP PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SccpAddresses<'a> {
    /// Raw SCCP message type octet
    pub message_type: u8,
    /// Called party Global Title, borrowed from the frame
    pub called_gt: &'a [u8],
    /// Calling party Global Title, borrowed from the frame
    pub calling_gt: &'a [u8],
    /// Absolute offset of the TCAP message tag
    pub tcap_offset: usize,
}

/// Resolve both Global Titles and the TCAP start from the SCCP pointers.
///
/// `cur` sits on the SCCP message type octet. Each pointer is relative to
/// its own position. The data pointer lands on the data length octet, so
/// TCAP begins one octet later.
pub fn decode_addresses(cur: ByteCursor<'_>) -> Result<SccpAddresses<'_>, DecodeError> {
    let message_type = cur.peek(0)?;

    let called_at = resolve_pointer(&cur, CALLED_POINTER)?;
    let calling_at = resolve_pointer(&cur, CALLING_POINTER)?;
    let data_at = resolve_pointer(&cur, DATA_POINTER)?;
    let tcap_offset = checked(&cur, data_at, 1)?;

    let called_gt = global_title(&cur, called_at)?;
    let calling_gt = global_title(&cur, calling_at)?;

    trace!(
        message_type,
        called_at,
        calling_at,
        tcap_offset,
        "SCCP pointers resolved"
    );

    Ok(SccpAddresses {
        message_type,
        called_gt,
        calling_gt,
        tcap_offset,
    })
}

fn resolve_pointer(cur: &ByteCursor<'_>, rel: usize) -> Result<usize, DecodeError> {
    let at = cur.offset(rel)?;
    let pointer = cur.u8_at(at)? as usize;
    checked(cur, at, pointer)
}

/// The address length counts the indicator and SSN octets that precede the
/// Global Title, so the title spans `length - 2` octets.
fn global_title<'a>(cur: &ByteCursor<'a>, addr_at: usize) -> Result<&'a [u8], DecodeError> {
    let length = cur.u8_at(addr_at)? as usize;
    let start = checked(cur, addr_at, GT_OFFSET)?;
    cur.slice(start, length.saturating_sub(2))
}

fn checked(cur: &ByteCursor<'_>, base: usize, add: usize) -> Result<usize, DecodeError> {
    base.checked_add(add).ok_or(DecodeError::TruncatedInput {
        offset: usize::MAX,
        bound: cur.end(),
    })
}
