//! Fixed-width numeric codecs.
//!
//! Integers are stored little-endian with high zero bytes trimmed, so
//! zero takes no bytes at all. Decoders accept any length and ignore
//! bytes past the eighth of a number.

/// Number of bytes needed to hold `value` with high zero bytes trimmed.
#[inline]
pub fn byte_len(value: u64) -> usize {
    (64 - value.leading_zeros() as usize).div_ceil(8)
}

/// Append `value` to `out` in its trimmed little-endian form.
pub fn append_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes()[..byte_len(value)]);
}

pub fn zip_u64(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(8);
    append_u64(&mut out, value);
    out
}

pub fn unzip_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let n = bytes.len().min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(buf)
}

#[inline]
pub fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

pub fn zip_i64(value: i64) -> Vec<u8> {
    zip_u64(zigzag(value))
}

pub fn unzip_i64(bytes: &[u8]) -> i64 {
    unzigzag(unzip_u64(bytes))
}

/// Floats keep their sign and exponent in the high bytes, so the bit
/// pattern is byte-swapped before trimming. `1.0` packs into two bytes.
pub fn zip_f64(value: f64) -> Vec<u8> {
    zip_u64(value.to_bits().swap_bytes())
}

pub fn unzip_f64(bytes: &[u8]) -> f64 {
    f64::from_bits(unzip_u64(bytes).swap_bytes())
}

/// Packed length of the pair `(big, lil)`.
///
/// `big` occupies the first `ceil(len/2)` bytes and `lil` the remaining
/// `floor(len/2)`; the length is the smallest one that fits both.
#[inline]
pub fn pair_len(big: u64, lil: u64) -> usize {
    let b = byte_len(big);
    let l = byte_len(lil);
    if b > l {
        2 * b - 1
    } else {
        2 * l
    }
}

/// Append the packed pair `(big, lil)` to `out`.
pub fn append_u64_pair(out: &mut Vec<u8>, big: u64, lil: u64) {
    let len = pair_len(big, lil);
    let big_len = len.div_ceil(2);
    out.extend_from_slice(&big.to_le_bytes()[..big_len]);
    out.extend_from_slice(&lil.to_le_bytes()[..len - big_len]);
}

pub fn zip_u64_pair(big: u64, lil: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    append_u64_pair(&mut out, big, lil);
    out
}

/// Inverse of [`zip_u64_pair`]. Returns `(big, lil)`.
pub fn unzip_u64_pair(bytes: &[u8]) -> (u64, u64) {
    let (big, lil) = bytes.split_at(bytes.len().div_ceil(2));
    (unzip_u64(big), unzip_u64(lil))
}
