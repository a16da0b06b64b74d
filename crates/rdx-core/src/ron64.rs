//! Radix-64 text codec for identifiers.
//!
//! The alphabet keeps ASCII order: digits, uppercase, underscore,
//! lowercase, tilde. Numbers are written most significant digit first.

/// The 64 digits, in value order.
pub const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz~";

/// Marks bytes that are not radix-64 digits in [`DIGIT_VALUES`].
pub const NOT_A_DIGIT: u8 = 0xff;

/// Reverse lookup: byte -> digit value, or [`NOT_A_DIGIT`].
pub const DIGIT_VALUES: [u8; 256] = build_digit_values();

const fn build_digit_values() -> [u8; 256] {
    let mut table = [NOT_A_DIGIT; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Mask for the 60 low bits that [`reverse_sextets`] operates on.
pub const MASK_60_BIT: u64 = (1 << 60) - 1;

/// Value of a single digit byte, if it is one.
#[inline]
pub fn digit_value(byte: u8) -> Option<u8> {
    match DIGIT_VALUES[byte as usize] {
        NOT_A_DIGIT => None,
        v => Some(v),
    }
}

/// Append the radix-64 form of `value` to `out`. Zero renders as `"0"`.
pub fn write_u64(out: &mut Vec<u8>, mut value: u64) {
    let mut digits = [0u8; 11];
    let mut pos = digits.len();
    loop {
        pos -= 1;
        digits[pos] = ALPHABET[(value & 63) as usize];
        value >>= 6;
        if value == 0 {
            break;
        }
    }
    out.extend_from_slice(&digits[pos..]);
}

/// Radix-64 form of `value` as a string.
pub fn encode_u64(value: u64) -> String {
    let mut out = Vec::with_capacity(11);
    write_u64(&mut out, value);
    // Every alphabet byte is ASCII.
    out.into_iter().map(char::from).collect()
}

/// Consume leading digits of `input` into a number.
///
/// Stops at the first non-digit byte or the end of input. Values longer
/// than 64 bits keep their low bits.
pub fn parse_u64(input: &[u8]) -> (u64, &[u8]) {
    let mut value = 0u64;
    let mut rest = input;
    while let Some((&byte, tail)) = rest.split_first() {
        let Some(digit) = digit_value(byte) else {
            break;
        };
        value = (value << 6) | u64::from(digit);
        rest = tail;
    }
    (value, rest)
}

/// Reverse the order of the ten 6-bit groups in the low 60 bits of `x`.
///
/// Bits above the 60th are ignored. Reversing twice is the identity on
/// 60-bit values.
pub fn reverse_sextets(x: u64) -> u64 {
    let mut x = x & MASK_60_BIT;
    let mut y = 0u64;
    let mut shift = 60;
    while x != 0 {
        y = (y << 6) | (x & 63);
        shift -= 6;
        x >>= 6;
    }
    y << shift
}
