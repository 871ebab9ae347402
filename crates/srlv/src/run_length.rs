//! Alternating run-length base decoder.
//!
//! Runs alternate between black (0) and white (1), starting with black.
//! A source byte with its high bit set is one run of up to 127 pixels; any
//! other byte packs two runs of up to 15 pixels, high nibble first. Every
//! run, including an empty one, toggles the colour afterwards.
//!
//! Once the payload is exhausted the colour is toggled once more and the
//! rest of the frame is padded with it, so the colour of the final run
//! extends to the end of the frame.

use crate::bit_writer::BitWriter;
use crate::error::DecodeError;

/// High bit: the low 7 bits are a single run length.
pub const FULL_RUN_MARKER: u8 = 0x80;

/// Mask for a full-byte run length.
pub const RUN_LENGTH_MASK: u8 = 0x7F;

/// Colour tracker for a run-length decode in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLengthState {
    /// Colour of the next run; `true` is white.
    color: bool,
}

impl RunLengthState {
    /// Fresh state: the first run is black.
    pub const fn new() -> Self {
        Self { color: false }
    }

    /// Colour of the next run.
    pub const fn color(&self) -> bool {
        self.color
    }

    /// Decode one source byte.
    pub fn feed(&mut self, byte: u8, writer: &mut BitWriter<'_>) -> Result<(), DecodeError> {
        if byte & FULL_RUN_MARKER != 0 {
            self.run(byte & RUN_LENGTH_MASK, writer)
        } else {
            self.run(byte >> 4, writer)?;
            self.run(byte & 0x0F, writer)
        }
    }

    fn run(&mut self, len: u8, writer: &mut BitWriter<'_>) -> Result<(), DecodeError> {
        writer.emit_run(self.color, usize::from(len))?;
        self.color = !self.color;
        Ok(())
    }

    /// Extend the last run's colour to the end of the frame.
    ///
    /// Returns the number of padded bits.
    pub fn finish(mut self, writer: &mut BitWriter<'_>) -> usize {
        self.color = !self.color;
        writer.finish(self.color)
    }
}

impl Default for RunLengthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a whole run-length payload into `out`.
///
/// Returns the number of bits supplied by end-of-stream padding.
pub fn decode_run_length(
    payload: &[u8],
    out: &mut [u8],
    policy: crate::OverrunPolicy,
) -> Result<usize, DecodeError> {
    let mut writer = BitWriter::new(out, policy);
    let mut state = RunLengthState::new();
    for &byte in payload {
        state.feed(byte, &mut writer)?;
    }
    Ok(state.finish(&mut writer))
}
