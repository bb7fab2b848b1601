//! # Parity Bit Codec
//!
//! One payload byte occupies a group of nine consecutive channel values (three RGB
//! pixels). The first eight carry the byte's bits MSB-first as channel parity; the
//! ninth is a marker that is odd only on the group holding the last byte of the
//! whole stream.
//!
//! ```text
//! [ b7 b6 b5 b4 b3 b2 b1 b0 | M ]   M = 1 -> last byte, M = 0 -> more follows
//!   R  G  B  R  G  B  R  G    B
//! ```
//!
//! Every function here is pure: it returns the new channel value instead of
//! mutating a pixel.

/// Channel values consumed by one payload byte (8 data + 1 marker).
pub const GROUP_LEN: usize = 9;

/// Force the parity of `value` to `bit` (false = even, true = odd).
///
/// Values are only ever decremented, except 0 which becomes 1 when an odd
/// parity is required.
pub fn encode_bit(value: u8, bit: bool) -> u8 {
    let odd = value & 1 == 1;
    match (bit, odd) {
        (false, true) => value - 1,
        (true, false) if value == 0 => 1,
        (true, false) => value - 1,
        _ => value,
    }
}

pub fn decode_bit(value: u8) -> bool {
    value & 1 == 1
}

/// Write the continuation/stop marker into the ninth value of a group.
pub fn encode_marker(value: u8, is_last_byte: bool) -> u8 {
    encode_bit(value, is_last_byte)
}

pub fn decode_marker(value: u8) -> bool {
    decode_bit(value)
}

/// Embed `byte` into a nine-value group in place.
///
/// # Panics
/// Panics if `group` is shorter than [`GROUP_LEN`]; callers hand out exact groups.
pub fn encode_group(group: &mut [u8], byte: u8, is_last_byte: bool) {
    for (i, value) in group[..8].iter_mut().enumerate() {
        let bit = (byte >> (7 - i)) & 1 == 1;
        *value = encode_bit(*value, bit);
    }
    group[8] = encode_marker(group[8], is_last_byte);
}

/// Read back a byte and its marker from a nine-value group.
///
/// # Panics
/// Panics if `group` is shorter than [`GROUP_LEN`]; callers hand out exact groups.
pub fn decode_group(group: &[u8]) -> (u8, bool) {
    let byte = group[..8]
        .iter()
        .fold(0u8, |acc, &value| (acc << 1) | decode_bit(value) as u8);
    (byte, decode_marker(group[8]))
}

/// Payload bytes a carrier of `width` x `height` RGB pixels can hold.
pub fn capacity(width: u32, height: u32) -> usize {
    (width as usize * height as usize * 3) / GROUP_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_inverts_encode_for_every_value() {
        for value in 0..=255u8 {
            for bit in [false, true] {
                let encoded = encode_bit(value, bit);
                assert_eq!(decode_bit(encoded), bit, "value {value} bit {bit}");
                assert!(value.abs_diff(encoded) <= 1);
            }
        }
    }

    #[test]
    fn test_encode_bit_edges() {
        assert_eq!(encode_bit(0, true), 1);
        assert_eq!(encode_bit(0, false), 0);
        assert_eq!(encode_bit(255, false), 254);
        assert_eq!(encode_bit(255, true), 255);
        assert_eq!(encode_bit(128, true), 127);
        assert_eq!(encode_bit(7, false), 6);
    }

    #[test]
    fn test_marker() {
        assert!(decode_marker(encode_marker(40, true)));
        assert!(!decode_marker(encode_marker(41, false)));
    }

    #[test]
    fn test_group_roundtrip() {
        let mut group = [200u8, 13, 0, 255, 64, 65, 2, 3, 9];
        encode_group(&mut group, 0b1010_0110, false);
        assert_eq!(decode_group(&group), (0b1010_0110, false));

        encode_group(&mut group, 0xFF, true);
        assert_eq!(decode_group(&group), (0xFF, true));
    }

    #[test]
    #[should_panic]
    fn test_decode_short_group_panics() {
        decode_group(&[0u8; GROUP_LEN - 1]);
    }

    #[test]
    fn test_capacity_uses_nine_values_per_byte() {
        assert_eq!(capacity(3, 1), 1);
        assert_eq!(capacity(2, 1), 0);
        assert_eq!(capacity(100, 100), 10_000);
        assert_eq!(capacity(10, 10), 33);
    }
}
