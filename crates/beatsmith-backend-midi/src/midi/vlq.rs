//! Variable-length quantity encoding for delta-times.
//!
//! SMF VLQ: 7 data bits per byte, most-significant group first, continuation
//! bit (0x80) set on every byte except the last. Values below 128 encode to a
//! single byte equal to the value; the four-byte form covers [0, 2^28).

/// Largest value a four-byte VLQ can hold.
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

/// Append the VLQ encoding of `value` to `buf`.
///
/// Values above [`VLQ_MAX`] are clamped; delta-times that large never occur
/// in practice.
pub fn write_var_len(buf: &mut Vec<u8>, value: u32) {
    let value = value.min(VLQ_MAX);
    if value < 0x80 {
        buf.push(value as u8);
        return;
    }

    let mut groups = [0u8; 4];
    let mut count = 0;
    let mut rest = value;
    while rest > 0 {
        groups[count] = (rest & 0x7F) as u8;
        rest >>= 7;
        count += 1;
    }
    for i in (1..count).rev() {
        buf.push(groups[i] | 0x80);
    }
    buf.push(groups[0]);
}

/// Decode a VLQ at the start of `data`.
///
/// Returns the value and the number of bytes consumed, or `None` if the data
/// ends mid-quantity or the quantity exceeds four bytes.
pub fn read_var_len(data: &[u8]) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    for (i, &byte) in data.iter().enumerate().take(4) {
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}
