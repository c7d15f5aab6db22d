//! Frame decode pipeline
//!
//! M3UA framing → SCCP addressing → TCAP transaction → first component.
//! Pure and reentrant: no I/O, no shared state, one frame per call.

use crate::cursor::ByteCursor;
use crate::errors::DecodeError;
use crate::m3ua::{self, CommonHeader};
use crate::sccp;
use crate::tcap;
use crate::types::DecodedMessage;
use tracing::{debug, instrument, trace};

/// Decode one M3UA message carried in an SCTP DATA chunk.
///
/// A header announcing no body short-circuits to a header-only message, as
/// does any message other than Transfer / Payload Data. An unrecognized
/// M3UA parameter or TCAP message tag ends decoding with the fields gathered
/// so far. Reads past the end of `frame` fail the whole frame.
#[instrument(level = "trace", skip(frame), fields(len = frame.len()))]
pub fn decode_m3ua(frame: &[u8]) -> Result<DecodedMessage<'_>, DecodeError> {
    let (mut msg, tcap_cur) = walk_to_tcap(frame)?;
    let Some(tcap_cur) = tcap_cur else {
        return Ok(msg);
    };

    msg.tcap_tag = Some(tcap_cur.peek(0)?);
    let summary = match tcap::decode_transaction(tcap_cur) {
        Ok(summary) => summary,
        Err(e) => return recover(msg, e),
    };
    msg.tcap_length = Some(summary.length);

    if let Some(component) = summary.component {
        msg.component_type = Some(component.component_type);
        msg.operation_code = component.operation_code;
        msg.imsi = component.imsi;
        msg.msc = component.msc;
        msg.vlr = component.vlr;
    }

    Ok(msg)
}

/// Decode the M3UA header and SCCP addressing only. TCAP is never read, so
/// a frame whose TCAP or component is damaged still yields its Global Titles.
pub fn decode_addressing(frame: &[u8]) -> Result<DecodedMessage<'_>, DecodeError> {
    walk_to_tcap(frame).map(|(msg, _)| msg)
}

/// Header, parameter walk and SCCP pointers. The cursor on the TCAP tag is
/// returned when the frame carries one.
fn walk_to_tcap(
    frame: &[u8],
) -> Result<(DecodedMessage<'_>, Option<ByteCursor<'_>>), DecodeError> {
    let cur = ByteCursor::new(frame);
    let header = CommonHeader::parse(&cur)?;
    let mut msg = DecodedMessage::header_only(header.length, header.message_type);

    if !header.has_body() {
        trace!(length = header.length, "M3UA message without body");
        return Ok((msg, None));
    }
    if !header.is_payload_data() {
        debug!(
            class = header.message_class,
            message_type = header.message_type,
            "not an M3UA payload data message"
        );
        return Ok((msg, None));
    }

    let protocol_data = match m3ua::find_protocol_data(cur.seek(m3ua::HEADER_LEN)) {
        Ok(at) => at,
        Err(e) => return recover((msg, None), e),
    };

    let sccp_at = protocol_data
        .checked_add(m3ua::PROTOCOL_DATA_USER_OFFSET)
        .ok_or(DecodeError::TruncatedInput {
            offset: usize::MAX,
            bound: frame.len(),
        })?;
    let addresses = sccp::decode_addresses(cur.seek(sccp_at))?;
    msg.called_global_title = Some(addresses.called_gt);
    msg.calling_global_title = Some(addresses.calling_gt);

    Ok((msg, Some(cur.seek(addresses.tcap_offset))))
}

/// Keep what was decoded when a layer hits a tag outside its set.
fn recover<T>(partial: T, err: DecodeError) -> Result<T, DecodeError> {
    if err.is_recoverable() {
        debug!(error = %err, "decode stopped early");
        Ok(partial)
    } else {
        Err(err)
    }
}
