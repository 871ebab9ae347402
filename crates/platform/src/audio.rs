//! Audio position abstraction

/// Read-only view of the audio subsystem, as seen by the video player.
pub trait AudioClock {
    /// `true` while a track is actively playing.
    fn is_playing(&self) -> bool;

    /// Elapsed playback position of the current track.
    fn position(&self) -> PlaybackPosition;
}

impl<T: AudioClock + ?Sized> AudioClock for &T {
    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn position(&self) -> PlaybackPosition {
        (**self).position()
    }
}

/// Playback position, in whichever unit the audio backend tracks natively.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackPosition {
    /// Elapsed time in seconds.
    Seconds(f64),
    /// Samples handed to the DAC so far.
    Samples {
        /// Sample frames played (one per channel pair).
        played: u64,
        /// Sample rate of the current track in Hz.
        sample_rate: u32,
    },
}

impl PlaybackPosition {
    /// Position in seconds. A zero sample rate (no track loaded) reads as 0.
    #[allow(clippy::cast_precision_loss)] // 2^52 samples is centuries of audio
    pub fn as_seconds(self) -> f64 {
        match self {
            Self::Seconds(seconds) => seconds,
            Self::Samples { sample_rate: 0, .. } => 0.0,
            Self::Samples {
                played,
                sample_rate,
            } => played as f64 / f64::from(sample_rate),
        }
    }
}

impl Default for PlaybackPosition {
    fn default() -> Self {
        Self::Seconds(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_pass_through() {
        assert!((PlaybackPosition::Seconds(12.5).as_seconds() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_samples_divide_by_rate() {
        let pos = PlaybackPosition::Samples {
            played: 66_150,
            sample_rate: 44_100,
        };
        assert!((pos.as_seconds() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rate_is_start() {
        let pos = PlaybackPosition::Samples {
            played: 1_000,
            sample_rate: 0,
        };
        assert!(pos.as_seconds().abs() < f64::EPSILON);
    }
}
