//! Resumable frame decode.
//!
//! A [`DecodeJob`] holds only plain data (mode, cursor, phase), never a
//! borrow, so the scheduler can keep it between ticks and drive it in
//! bounded slices with [`DecodeJob::step`]. The compressed bytes, reference
//! frame and output buffer are passed in again on every call and must be
//! the same each time.
//!
//! Work is counted in units:
//!
//! | Phase                    | One unit            |
//! |--------------------------|---------------------|
//! | base decode              | one source byte     |
//! | differential integration | one output byte     |
//! | post-transform           | the whole transform |
//!
//! End-of-stream padding is bounded by the frame size and is not counted.
//! A job that has started cannot be cancelled part-way: once the output
//! buffer has been touched, drive it to completion or discard the buffer.

use crate::bit_writer::{BitWriter, WriterState};
use crate::config::DecoderConfig;
use crate::differential;
use crate::error::DecodeError;
use crate::geometry::FrameGeometry;
use crate::mode::{Family, Mode, Transform};
use crate::run_length::RunLengthState;
use crate::transform::{apply_delta, apply_snake};

/// Outcome of a finished decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeReport {
    /// Mode tag of the frame.
    pub mode: Mode,
    /// Payload bytes consumed (excluding the mode tag).
    pub consumed: usize,
    /// Bits supplied by end-of-stream padding.
    pub padded_bits: usize,
    /// Bits discarded past the end of the frame (lenient mode only).
    pub dropped_bits: usize,
}

/// Result of one [`DecodeJob::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// The budget ran out; call `step` again.
    Pending,
    /// The output buffer holds the decoded frame.
    Complete(DecodeReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    RunLength(RunLengthState),
    Differential,
    Integrate { next: usize, level: bool },
    Transform,
    Done,
}

/// A frame decode that can be suspended between work units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeJob {
    mode: Mode,
    geometry: FrameGeometry,
    config: DecoderConfig,
    phase: Phase,
    writer: WriterState,
    consumed: usize,
    padded_bits: usize,
}

impl DecodeJob {
    /// Read the mode tag and validate the inputs, without decoding anything.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Empty`] if `compressed` has no mode tag
    /// - [`DecodeError::UnknownMode`] for an unrecognised tag
    /// - [`DecodeError::MissingReference`] / [`DecodeError::ReferenceLength`]
    ///   for a delta frame without a usable reference
    pub fn new(
        compressed: &[u8],
        geometry: FrameGeometry,
        reference: Option<&[u8]>,
        config: DecoderConfig,
    ) -> Result<Self, DecodeError> {
        let (&tag, _) = compressed.split_first().ok_or(DecodeError::Empty)?;
        let mode = Mode::try_from(tag)?;
        if mode.needs_reference() {
            checked_reference(reference, geometry.frame_len())?;
        }
        let phase = match mode.family() {
            Family::RunLength => Phase::RunLength(RunLengthState::new()),
            Family::Differential => Phase::Differential,
        };
        Ok(Self {
            mode,
            geometry,
            config,
            phase,
            writer: WriterState::new(),
            consumed: 0,
            padded_bits: 0,
        })
    }

    /// Mode of the frame being decoded.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// `true` once [`step`](Self::step) has returned [`Progress::Complete`].
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Payload bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn report(&self) -> DecodeReport {
        DecodeReport {
            mode: self.mode,
            consumed: self.consumed,
            padded_bits: self.padded_bits,
            dropped_bits: self.writer.dropped_bits(),
        }
    }

    /// Do at most `budget` units of work.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`]; the job and the output buffer are unusable
    /// afterwards.
    #[allow(clippy::arithmetic_side_effects)] // units only decremented while > 0; offsets bounded by frame_len
    pub fn step(
        &mut self,
        compressed: &[u8],
        reference: Option<&[u8]>,
        out: &mut [u8],
        budget: usize,
    ) -> Result<Progress, DecodeError> {
        let frame_len = self.geometry.frame_len();
        if out.len() != frame_len {
            return Err(DecodeError::OutputLength {
                expected: frame_len,
                actual: out.len(),
            });
        }
        let payload = compressed.get(1..).unwrap_or_default();
        let mut units = budget;

        loop {
            match self.phase {
                Phase::RunLength(mut state) => {
                    let mut writer = BitWriter::resume(out, self.writer, self.config.overrun);
                    while units > 0 {
                        let Some(&byte) = payload.get(self.consumed) else {
                            break;
                        };
                        state.feed(byte, &mut writer)?;
                        self.consumed += 1;
                        units -= 1;
                    }
                    if self.consumed < payload.len() {
                        self.writer = writer.state();
                        self.phase = Phase::RunLength(state);
                        return Ok(Progress::Pending);
                    }
                    self.padded_bits = state.finish(&mut writer);
                    self.writer = writer.state();
                    self.phase = Phase::Transform;
                }
                Phase::Differential => {
                    let mut writer = BitWriter::resume(out, self.writer, self.config.overrun);
                    while units > 0 {
                        let Some(&byte) = payload.get(self.consumed) else {
                            break;
                        };
                        differential::feed(byte, &mut writer)?;
                        self.consumed += 1;
                        units -= 1;
                    }
                    self.writer = writer.state();
                    if self.consumed < payload.len() {
                        return Ok(Progress::Pending);
                    }
                    self.padded_bits = differential::finish(&mut writer);
                    self.writer = writer.state();
                    self.phase = Phase::Integrate {
                        next: 0,
                        level: false,
                    };
                }
                Phase::Integrate { next, level } => {
                    let end = next.saturating_add(units).min(frame_len);
                    let level = match out.get_mut(next..end) {
                        Some(bytes) => differential::integrate(bytes, level),
                        None => level,
                    };
                    units -= end - next;
                    if end < frame_len {
                        self.phase = Phase::Integrate { next: end, level };
                        return Ok(Progress::Pending);
                    }
                    self.phase = Phase::Transform;
                }
                Phase::Transform => {
                    if units == 0 {
                        return Ok(Progress::Pending);
                    }
                    units -= 1;
                    match self.mode.transform() {
                        Transform::None => {}
                        Transform::Delta => {
                            let reference = checked_reference(reference, frame_len)?;
                            apply_delta(out, reference)?;
                        }
                        Transform::Snake => apply_snake(out, self.geometry.bytes_per_row()),
                    }
                    self.phase = Phase::Done;
                }
                Phase::Done => return Ok(Progress::Complete(self.report())),
            }
        }
    }

    /// Drive the job to completion in one call.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] raised by [`step`](Self::step).
    pub fn run(
        &mut self,
        compressed: &[u8],
        reference: Option<&[u8]>,
        out: &mut [u8],
    ) -> Result<DecodeReport, DecodeError> {
        loop {
            if let Progress::Complete(report) = self.step(compressed, reference, out, usize::MAX)? {
                return Ok(report);
            }
        }
    }
}

fn checked_reference(reference: Option<&[u8]>, expected: usize) -> Result<&[u8], DecodeError> {
    let reference = reference.ok_or(DecodeError::MissingReference)?;
    if reference.len() != expected {
        return Err(DecodeError::ReferenceLength {
            expected,
            actual: reference.len(),
        });
    }
    Ok(reference)
}
