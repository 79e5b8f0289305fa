//! `%XX` escape decoding.

/// Bytes consumed by a successful escape.
pub const ESCAPE_LEN: usize = 3;

/// Decode the escape at the start of `input`, which must begin with `%`.
///
/// Returns `None` when fewer than two bytes follow the `%` or either of them
/// is not an ASCII hex digit. The caller decides how to fall back.
#[inline]
pub fn unescape(input: &[u8]) -> Option<u8> {
    debug_assert!(input.first() == Some(&b'%'));

    match input {
        [_, hi, lo, ..] => Some((hex_value(*hi)? << 4) | hex_value(*lo)?),
        _ => None,
    }
}

/// Value of a single ASCII hex digit (either case).
#[inline]
const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
