//! Integer-only number formatting for the OBJ text.
//!
//! Output must be byte-for-byte reproducible across platforms, so nothing
//! here goes through floating point.

use crate::constants::{LATTICE_SUBDIVISIONS, TEXCOORD_DIGITS};

/// Appends the decimal digits of `n`.
pub(crate) fn push_uint(buf: &mut String, mut n: u64) {
    let mut digits = [0u8; 20];
    let mut j = digits.len();
    loop {
        j -= 1;
        digits[j] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    for &d in &digits[j..] {
        buf.push(d as char);
    }
}

/// Appends a lattice coordinate scaled down by [`LATTICE_SUBDIVISIONS`]
/// with exactly two fractional digits: `1` prints `0.05`, `-64` prints `-3.20`.
pub fn push_fixed2(buf: &mut String, value: i64) {
    let abs = value.unsigned_abs();
    let high = abs / LATTICE_SUBDIVISIONS;
    let low = (abs % LATTICE_SUBDIVISIONS) * (100 / LATTICE_SUBDIVISIONS);
    if value < 0 {
        buf.push('-');
    }
    push_uint(buf, high);
    buf.push('.');
    buf.push((b'0' + (low / 10) as u8) as char);
    buf.push((b'0' + (low % 10) as u8) as char);
}

/// Appends `num / den` truncated to [`TEXCOORD_DIGITS`] fractional digits by
/// long division. A zero denominator has no value; nothing is written and
/// `false` is returned.
pub fn push_ratio8(buf: &mut String, num: u64, den: u64) -> bool {
    if den == 0 {
        return false;
    }
    push_uint(buf, num / den);
    buf.push('.');
    let mut rem = num % den;
    for _ in 0..TEXCOORD_DIGITS {
        rem *= 10;
        buf.push((b'0' + (rem / den) as u8) as char);
        rem %= den;
    }
    true
}
