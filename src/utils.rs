//! Utility functions used across the library.

/// Encodes a password as UTF-16LE (required only for legacy ACKDF in AES Crypt v1–v2).
///
/// v3 files feed raw UTF-8 to PBKDF2 and never call this.
#[inline(always)]
pub fn utf8_to_utf16le(input: &str) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() * 2);
    for code_unit in input.encode_utf16() {
        output.extend_from_slice(&code_unit.to_le_bytes());
    }
    output
}

/// Integer percentage of `done` over `total`, clamped to 100.
///
/// An empty total counts as complete.
#[inline]
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    // u128 keeps `done * 100` from overflowing on 32-bit targets
    let pct = (done as u128 * 100) / total as u128;
    pct.min(100) as u8
}
