//! One-shot frame decode.

use core::fmt;

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::geometry::FrameGeometry;
use crate::job::{DecodeJob, DecodeReport};

/// Decode one compressed frame into `out` with the strict default config.
///
/// `out` must be exactly `geometry.frame_len()` bytes; `reference` is the
/// previous decoded frame and is only read by delta modes.
///
/// # Errors
///
/// Any [`DecodeError`]. On error the contents of `out` are unspecified.
pub fn decode(
    compressed: &[u8],
    geometry: FrameGeometry,
    reference: Option<&[u8]>,
    out: &mut [u8],
) -> Result<DecodeReport, DecodeError> {
    decode_with(compressed, geometry, reference, out, DecoderConfig::default())
}

/// [`decode`] with an explicit [`DecoderConfig`].
///
/// # Errors
///
/// Any [`DecodeError`]. On error the contents of `out` are unspecified.
pub fn decode_with(
    compressed: &[u8],
    geometry: FrameGeometry,
    reference: Option<&[u8]>,
    out: &mut [u8],
    config: DecoderConfig,
) -> Result<DecodeReport, DecodeError> {
    DecodeJob::new(compressed, geometry, reference, config)?.run(compressed, reference, out)
}

/// Fixed-capacity storage for one decoded frame.
///
/// `N` is the sequence's `frame_len()`; the player keeps two of these and
/// swaps them so the previous frame is always available as a delta
/// reference.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FrameBuffer<N> {
    /// All-black frame.
    pub const fn zeroed() -> Self {
        Self { bytes: [0; N] }
    }

    /// Wrap an already decoded bitmap.
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    /// Packed bitmap, row-major, LSB-first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access for in-place decoding.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl<const N: usize> Default for FrameBuffer<N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

// A 48 KB array is useless in debug output.
impl<const N: usize> fmt::Debug for FrameBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ones: u32 = self.bytes.iter().map(|b| b.count_ones()).sum();
        f.debug_struct("FrameBuffer")
            .field("len", &N)
            .field("white_pixels", &ones)
            .finish()
    }
}

/// Decode a frame into a fresh [`FrameBuffer`].
///
/// # Errors
///
/// [`DecodeError::OutputLength`] when `N` does not match the geometry, plus
/// anything [`decode`] returns.
pub fn decode_frame<const N: usize>(
    compressed: &[u8],
    geometry: FrameGeometry,
    reference: Option<&FrameBuffer<N>>,
) -> Result<FrameBuffer<N>, DecodeError> {
    let mut frame = FrameBuffer::zeroed();
    decode(
        compressed,
        geometry,
        reference.map(FrameBuffer::as_bytes),
        frame.as_mut_bytes(),
    )?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mode;

    fn single_row() -> FrameGeometry {
        FrameGeometry::new(8, 1).expect("valid geometry")
    }

    #[test]
    fn test_run_length_single_byte() {
        // empty black run, 5 white, 3 black
        let mut out = [0u8; 1];
        let report = decode(&[0, 0x05, 0x83], single_row(), None, &mut out).expect("decodes");
        assert_eq!(out, [0x1F]);
        assert_eq!(report.mode, Mode::RunLength);
    }

    #[test]
    fn test_run_length_delta_uses_reference() {
        let mut out = [0u8; 1];
        decode(&[1, 0x05, 0x83], single_row(), Some(&[0xFF][..]), &mut out).expect("decodes");
        assert_eq!(out, [0xE0]);
    }

    #[test]
    fn test_snake_odd_row_mirrored() {
        let geometry = FrameGeometry::new(8, 2).expect("valid geometry");
        // row 0: 8 white; row 1 scanned right to left: 1 black then 7 white
        let mut out = [0u8; 2];
        decode(&[2, 0x80, 0x88, 0x81, 0x87], geometry, None, &mut out).expect("decodes");
        assert_eq!(out, [0xFF, 0x7F]);
    }

    #[test]
    fn test_differential_all_toggles_then_zero_run() {
        // 7 literal one bits, then a run of one zero bit
        let mut out = [0u8; 1];
        decode(&[3, 0x7F, 0x80], single_row(), None, &mut out).expect("decodes");
        // toggles at bits 0..=6: levels 1,0,1,0,1,0,1 then bit 7 holds 1
        assert_eq!(out, [0b1101_0101]);
    }

    #[test]
    fn test_decode_frame_wrong_capacity() {
        let result = decode_frame::<2>(&[0, 0x05], single_row(), None);
        assert_eq!(
            result,
            Err(DecodeError::OutputLength {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_decode_frame_chains_reference() {
        let first = decode_frame::<1>(&[0, 0x05, 0x83], single_row(), None).expect("decodes");
        // two empty runs, then white padding: the delta inverts the reference
        let second = decode_frame::<1>(&[1, 0x00], single_row(), Some(&first)).expect("decodes");
        assert_eq!(second.as_bytes(), &[0xE0]);
    }

    #[test]
    fn test_debug_does_not_dump_bytes() {
        let frame = FrameBuffer::<4>::from_bytes([0xFF, 0, 0, 0x01]);
        let text = format!("{frame:?}");
        assert!(text.contains("white_pixels: 9"));
    }
}
