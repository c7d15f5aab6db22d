//! SCCP (Signaling Connection Control Part)
//!
//! ITU-T Q.713 connectionless message layout, read through the three
//! mandatory-variable pointers only.

mod address;

pub use address::{decode_addresses, SccpAddresses};
