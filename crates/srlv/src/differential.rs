//! Differential (edge-coded) base decoder.
//!
//! Decoding happens in two phases:
//!
//! 1. **Assembly.** Each source byte with its high bit set is a run of
//!    `(low 7 bits) + 1` zero bits; any other byte carries 7 literal bits,
//!    copied least-significant first. The remainder of the frame is padded
//!    with zeros.
//! 2. **Integration.** Every assembled bit is a toggle relative to the
//!    previous pixel in stream order. A single running level is carried
//!    across bytes and rows: `level ^= raw_bit`.

use crate::bit_writer::BitWriter;
use crate::error::DecodeError;

/// High bit: the low 7 bits encode a zero run.
pub const ZERO_RUN_MARKER: u8 = 0x80;

/// Mask for the run length / literal bits.
pub const PAYLOAD_MASK: u8 = 0x7F;

/// Literal bits carried by a non-run byte.
pub const LITERAL_BITS: u8 = 7;

/// Phase 1: append one source byte to the raw toggle stream.
pub fn feed(byte: u8, writer: &mut BitWriter<'_>) -> Result<(), DecodeError> {
    if byte & ZERO_RUN_MARKER != 0 {
        writer.emit_run(false, usize::from(byte & PAYLOAD_MASK) + 1)
    } else {
        writer.emit_bits(byte & PAYLOAD_MASK, LITERAL_BITS)
    }
}

/// Phase 1 end: pad with "no toggle" bits. Returns the padded bit count.
pub fn finish(writer: &mut BitWriter<'_>) -> usize {
    writer.finish(false)
}

/// Phase 2: turn toggle bits into levels, in place.
///
/// `previous` is the level of the pixel just before `bytes[0]`; the level of
/// the last pixel is returned so integration can continue in a later slice.
pub fn integrate(bytes: &mut [u8], previous: bool) -> bool {
    let mut level = previous;
    for byte in bytes {
        *byte = integrate_byte(*byte, level);
        level = *byte & 0x80 != 0;
    }
    level
}

/// Prefix XOR of the 8 bits of `raw` (LSB first), seeded with `previous`.
///
/// Bit `i` of the result is `previous ^ raw[0] ^ … ^ raw[i]`.
const fn integrate_byte(raw: u8, previous: bool) -> u8 {
    let mut x = raw;
    x ^= x << 1;
    x ^= x << 2;
    x ^= x << 4;
    if previous {
        !x
    } else {
        x
    }
}

/// Decode a whole differential payload into `out`.
///
/// Returns the number of bits supplied by end-of-stream padding.
pub fn decode_differential(
    payload: &[u8],
    out: &mut [u8],
    policy: crate::OverrunPolicy,
) -> Result<usize, DecodeError> {
    let padded = {
        let mut writer = BitWriter::new(out, policy);
        for &byte in payload {
            feed(byte, &mut writer)?;
        }
        finish(&mut writer)
    };
    integrate(out, false);
    Ok(padded)
}
