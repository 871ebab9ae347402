//! Error types for frame decoding.
//!
//! Every error is deterministic for a given input: decoding is pure, so
//! nothing here is retryable. The caller decides whether to skip the frame,
//! stop playback or substitute a blank frame.

use thiserror::Error;

/// Errors returned while decoding a compressed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The compressed frame has no bytes at all, so there is no mode tag.
    #[error("compressed frame is empty (missing mode tag)")]
    Empty,
    /// Byte 0 is not one of the six known mode tags.
    #[error("unknown mode tag {0:#04x}")]
    UnknownMode(u8),
    /// A delta-mode frame was requested without a reference frame.
    #[error("delta frame requested without a reference frame")]
    MissingReference,
    /// The reference frame does not have the sequence's fixed frame size.
    #[error("reference frame is {actual} bytes, expected {expected}")]
    ReferenceLength {
        /// Fixed frame size of the sequence.
        expected: usize,
        /// Size of the supplied reference.
        actual: usize,
    },
    /// The output buffer does not have the sequence's fixed frame size.
    #[error("output buffer is {actual} bytes, expected {expected}")]
    OutputLength {
        /// Fixed frame size of the sequence.
        expected: usize,
        /// Size of the supplied output buffer.
        actual: usize,
    },
    /// The payload describes more pixels than the frame holds.
    #[error("payload overruns the {limit}-byte frame")]
    Overrun {
        /// Frame size in bytes that was exceeded.
        limit: usize,
    },
}

/// Errors returned when constructing a [`FrameGeometry`](crate::FrameGeometry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Width or height is zero.
    #[error("frame geometry has a zero dimension")]
    ZeroDimension,
    /// The packed bitmap would exceed [`MAX_FRAME_BYTES`](crate::MAX_FRAME_BYTES).
    #[error("frame of {bytes} bytes exceeds the {max}-byte limit")]
    TooLarge {
        /// Packed size that was requested.
        bytes: usize,
        /// Upper bound.
        max: usize,
    },
}
