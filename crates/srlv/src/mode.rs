//! The one-byte mode tag at the start of every compressed frame.

use crate::error::DecodeError;

/// Primary entropy coding of a frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    /// Alternating-colour runs, nibble-packed or full-byte.
    RunLength,
    /// Zero runs and literal toggle bits, integrated into levels afterwards.
    Differential,
}

/// Correction applied after the base decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transform {
    /// Base decode output is final.
    None,
    /// XOR against the previous decoded frame.
    Delta,
    /// Undo boustrophedon scan order on odd rows.
    Snake,
}

/// Mode tag: base family plus at most one post-transform.
///
/// Wire values are `0..=5` in declaration order; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Run-length, no transform.
    RunLength = 0,
    /// Run-length, inter-frame delta.
    RunLengthDelta = 1,
    /// Run-length, snake order.
    RunLengthSnake = 2,
    /// Differential, no transform.
    Differential = 3,
    /// Differential, inter-frame delta.
    DifferentialDelta = 4,
    /// Differential, snake order.
    DifferentialSnake = 5,
}

impl Mode {
    /// All modes, in tag order.
    pub const ALL: [Mode; 6] = [
        Mode::RunLength,
        Mode::RunLengthDelta,
        Mode::RunLengthSnake,
        Mode::Differential,
        Mode::DifferentialDelta,
        Mode::DifferentialSnake,
    ];

    /// Wire value of this mode.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Base decoder for this mode.
    pub const fn family(self) -> Family {
        match self {
            Mode::RunLength | Mode::RunLengthDelta | Mode::RunLengthSnake => Family::RunLength,
            Mode::Differential | Mode::DifferentialDelta | Mode::DifferentialSnake => {
                Family::Differential
            }
        }
    }

    /// Post-transform for this mode.
    pub const fn transform(self) -> Transform {
        match self {
            Mode::RunLength | Mode::Differential => Transform::None,
            Mode::RunLengthDelta | Mode::DifferentialDelta => Transform::Delta,
            Mode::RunLengthSnake | Mode::DifferentialSnake => Transform::Snake,
        }
    }

    /// `true` when decoding needs the previous frame.
    pub const fn needs_reference(self) -> bool {
        matches!(self.transform(), Transform::Delta)
    }
}

impl TryFrom<u8> for Mode {
    type Error = DecodeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Mode::RunLength),
            1 => Ok(Mode::RunLengthDelta),
            2 => Ok(Mode::RunLengthSnake),
            3 => Ok(Mode::Differential),
            4 => Ok(Mode::DifferentialDelta),
            5 => Ok(Mode::DifferentialSnake),
            other => Err(DecodeError::UnknownMode(other)),
        }
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode.tag()
    }
}
