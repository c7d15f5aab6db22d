//! MAP (Mobile Application Part) identifiers
//!
//! GSM 09.02 / 3GPP TS 29.002 operation codes seen on the probed links and
//! the subscriber/location field extractors.

mod identity;

pub use identity::{decode_imsi, hex_address, IMSI_DIGITS, IMSI_OCTETS};

/// MAP Operation Codes
pub mod operation {
    // Location Management
    pub const UPDATE_LOCATION: u8 = 2;
    pub const CANCEL_LOCATION: u8 = 3;
    pub const PURGE_MS: u8 = 67;

    // Subscriber Data Management
    pub const INSERT_SUBSCRIBER_DATA: u8 = 7;
    pub const DELETE_SUBSCRIBER_DATA: u8 = 8;

    // Authentication
    pub const SEND_AUTHENTICATION_INFO: u8 = 56;

    // SMS Operations
    pub const SEND_ROUTING_INFO_FOR_SM: u8 = 45;
    pub const MO_FORWARD_SHORT_MESSAGE: u8 = 46;
    pub const MT_FORWARD_SHORT_MESSAGE: u8 = 44;
    pub const REPORT_SM_DELIVERY_STATUS: u8 = 47;

    // USSD Operations
    pub const PROCESS_UNSTRUCTURED_SS_REQUEST: u8 = 59;
    pub const UNSTRUCTURED_SS_REQUEST: u8 = 60;
    pub const UNSTRUCTURED_SS_NOTIFY: u8 = 61;
}

/// Human-readable name of a MAP operation code
pub fn operation_name(code: u8) -> Option<&'static str> {
    use operation::*;

    let name = match code {
        UPDATE_LOCATION => "updateLocation",
        CANCEL_LOCATION => "cancelLocation",
        PURGE_MS => "purgeMS",
        INSERT_SUBSCRIBER_DATA => "insertSubscriberData",
        DELETE_SUBSCRIBER_DATA => "deleteSubscriberData",
        SEND_AUTHENTICATION_INFO => "sendAuthenticationInfo",
        SEND_ROUTING_INFO_FOR_SM => "sendRoutingInfoForSM",
        MO_FORWARD_SHORT_MESSAGE => "mo-forwardSM",
        MT_FORWARD_SHORT_MESSAGE => "mt-forwardSM",
        REPORT_SM_DELIVERY_STATUS => "reportSM-DeliveryStatus",
        PROCESS_UNSTRUCTURED_SS_REQUEST => "processUnstructuredSS-Request",
        UNSTRUCTURED_SS_REQUEST => "unstructuredSS-Request",
        UNSTRUCTURED_SS_NOTIFY => "unstructuredSS-Notify",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(operation_name(operation::UPDATE_LOCATION), Some("updateLocation"));
        assert_eq!(operation_name(56), Some("sendAuthenticationInfo"));
        assert_eq!(operation_name(200), None);
    }
}
