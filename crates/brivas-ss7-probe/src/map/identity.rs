//! Subscriber and network-element identity rendering

/// IMSI octets in a MAP parameter
pub const IMSI_OCTETS: usize = 8;

/// Meaningful IMSI digits; the 16th nibble is filler
pub const IMSI_DIGITS: usize = 15;

/// Render a TBCD-encoded IMSI.
///
/// Each octet carries its first digit in the low nibble, so the nibbles are
/// swapped before hex rendering and the trailing filler digit is dropped.
pub fn decode_imsi(octets: &[u8; IMSI_OCTETS]) -> String {
    let swapped: Vec<u8> = octets.iter().map(|b| b.rotate_left(4)).collect();
    let mut digits = hex::encode(swapped);
    digits.truncate(IMSI_DIGITS);
    digits
}

/// Lowercase hex rendering of an address as carried on the wire
pub fn hex_address(octets: &[u8]) -> String {
    hex::encode(octets)
}
