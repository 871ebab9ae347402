//! Synchroniser and player configuration.
//!
//! Plain typed structs with `Default` and `validate()`. Values come from the
//! frame table at build time; nothing here is read from a file at runtime.

use platform::config::VIDEO_FPS;
use srlv::DecoderConfig;
use thiserror::Error;

/// Empirical audio/video drift factor of the bundled animation.
///
/// Multiplied into the audio-derived frame index. It compensates a constant
/// desync observed on hardware (likely a 44.1/48 kHz mismatch somewhere in
/// the audio path) and is a tunable, not a physical constant.
pub const DEFAULT_DRIFT_CORRECTION: f64 = 219.0 / 224.0;

/// Frames a [`VideoPlayer`](crate::VideoPlayer) replays to rebuild a delta
/// reference before giving up and decoding against a stale one.
pub const DEFAULT_MAX_CATCH_UP: usize = 8;

/// Errors returned by [`SyncConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Frame rate is zero, negative, NaN or infinite.
    #[error("frame rate must be finite and positive")]
    InvalidFrameRate,
    /// Drift correction is zero, negative, NaN or infinite.
    #[error("drift correction must be finite and positive")]
    InvalidDriftCorrection,
    /// The sequence has no frames.
    #[error("frame count must be at least 1")]
    NoFrames,
}

/// Parameters of the [`PlaybackSynchronizer`](crate::PlaybackSynchronizer).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncConfig {
    /// Nominal frames per second of the sequence.
    pub frame_rate: f64,
    /// Factor applied to the audio-derived frame index.
    pub drift_correction: f64,
    /// Number of frames; indices wrap at this value.
    pub frame_count: usize,
}

impl SyncConfig {
    /// Default rate and drift correction for a sequence of `frame_count` frames.
    pub const fn with_frame_count(frame_count: usize) -> Self {
        Self {
            frame_rate: VIDEO_FPS,
            drift_correction: DEFAULT_DRIFT_CORRECTION,
            frame_count,
        }
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// The first invalid field, as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::InvalidFrameRate);
        }
        if !(self.drift_correction.is_finite() && self.drift_correction > 0.0) {
            return Err(ConfigError::InvalidDriftCorrection);
        }
        if self.frame_count == 0 {
            return Err(ConfigError::NoFrames);
        }
        Ok(())
    }

    /// Length of one frame in microseconds, rounded, at least 1.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // validated positive; saturating cast
    pub fn frame_period_us(&self) -> u64 {
        let period = libm::round(1_000_000.0 / self.frame_rate);
        (period as u64).max(1)
    }
}

impl Default for SyncConfig {
    /// The bundled animation's rate and drift, for a single frame.
    fn default() -> Self {
        Self::with_frame_count(1)
    }
}

/// Tunables of a [`VideoPlayer`](crate::VideoPlayer).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerConfig {
    /// Drift correction handed to the synchroniser.
    pub drift_correction: f64,
    /// Longest delta chain replayed to rebuild a reference frame.
    pub max_catch_up: usize,
    /// Decoder settings. Frame tables are trusted build-time data, but the
    /// default still rejects overruns.
    pub decoder: DecoderConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            drift_correction: DEFAULT_DRIFT_CORRECTION,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
            decoder: DecoderConfig::default(),
        }
    }
}
