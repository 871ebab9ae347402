//! Post-transforms applied after the base decode.
//!
//! Both transforms are involutions: applying one twice restores the input.

use crate::error::DecodeError;

/// XOR `frame` with `reference` byte by byte, in place.
///
/// # Errors
///
/// [`DecodeError::ReferenceLength`] when the two buffers differ in size.
pub fn apply_delta(frame: &mut [u8], reference: &[u8]) -> Result<(), DecodeError> {
    if frame.len() != reference.len() {
        return Err(DecodeError::ReferenceLength {
            expected: frame.len(),
            actual: reference.len(),
        });
    }
    for (byte, previous) in frame.iter_mut().zip(reference) {
        *byte ^= previous;
    }
    Ok(())
}

/// Undo boustrophedon scan order.
///
/// Every odd row (0-indexed) has its bytes reversed and each byte's bits
/// reversed, which mirrors the row pixel by pixel. Even rows are untouched.
/// A trailing partial row, if `frame.len()` is not a multiple of
/// `bytes_per_row`, is left alone.
pub fn apply_snake(frame: &mut [u8], bytes_per_row: usize) {
    if bytes_per_row == 0 {
        return;
    }
    for row in frame.chunks_exact_mut(bytes_per_row).skip(1).step_by(2) {
        row.reverse();
        for byte in row.iter_mut() {
            *byte = reverse_bits(*byte);
        }
    }
}

/// Mirror the 8 bits of a byte: swap neighbours, then pairs, then nibbles.
pub const fn reverse_bits(byte: u8) -> u8 {
    let b = ((byte & 0x55) << 1) | ((byte & 0xAA) >> 1);
    let b = ((b & 0x33) << 2) | ((b & 0xCC) >> 2);
    (b << 4) | (b >> 4)
}
