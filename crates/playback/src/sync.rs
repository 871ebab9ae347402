//! Playback synchroniser.
//!
//! `PlaybackSynchronizer` is a pure, `no_std`, allocation-free state machine
//! that maps a continuously advancing time signal onto a frame index with
//! wrap-around, and says whether the frame on screen is stale.
//!
//! It has **no** I/O: the audio position and the current time are passed
//! into [`poll`](PlaybackSynchronizer::poll), which makes every transition
//! testable on the host.
//!
//! Two driving modes, chosen on every poll:
//!
//! - **Audio-following** while audio plays:
//!   `floor(position_s * frame_rate * drift_correction) mod frame_count`.
//! - **Free-running** otherwise: one frame per `1 / frame_rate` seconds of
//!   wall time since the previous poll, continuing from the current frame.

use platform::AudioClock;

use crate::config::{ConfigError, SyncConfig};

/// What the player should do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncDecision {
    /// Decode and show this frame.
    Redraw(usize),
    /// The frame on screen is still current.
    Hold,
}

/// Which clock drove the most recent poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncSource {
    /// Audio playback position.
    Audio,
    /// Scheduler wall clock.
    FreeRunning,
}

/// Frame scheduler for one video sequence.
#[derive(Debug, Clone)]
pub struct PlaybackSynchronizer {
    config: SyncConfig,
    period_us: u64,
    current: usize,
    shown: bool,
    last_poll_us: Option<u64>,
    /// Free-running time not yet converted into whole frames.
    carry_us: u64,
    source: SyncSource,
}

impl PlaybackSynchronizer {
    /// Create a synchroniser at frame 0 with nothing on screen.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`SyncConfig::validate`].
    pub fn new(config: SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            period_us: config.frame_period_us(),
            current: 0,
            shown: false,
            last_poll_us: None,
            carry_us: 0,
            source: SyncSource::FreeRunning,
        })
    }

    /// Frame index for an audio position, without touching any state.
    ///
    /// Negative or NaN positions map to frame 0.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::arithmetic_side_effects
    )] // floor() ≥ 0 and saturating cast; frame_count validated non-zero
    pub fn frame_for_position(&self, position_s: f64) -> usize {
        let scaled = position_s * self.config.frame_rate * self.config.drift_correction;
        if scaled.is_nan() || scaled <= 0.0 {
            return 0;
        }
        let linear = libm::floor(scaled) as u64;
        // frame_count fits in u64 on every supported target.
        (linear % self.config.frame_count as u64) as usize
    }

    /// Advance the state machine and decide whether to redraw.
    ///
    /// `now_us` must come from a monotonic clock. The first poll after
    /// construction or [`reset`](Self::reset) always asks for a redraw.
    pub fn poll<A: AudioClock + ?Sized>(&mut self, audio: &A, now_us: u64) -> SyncDecision {
        let previous = self.current;
        let elapsed = self
            .last_poll_us
            .map_or(0, |last| now_us.saturating_sub(last));
        self.last_poll_us = Some(now_us);

        if audio.is_playing() {
            self.source = SyncSource::Audio;
            self.carry_us = 0;
            self.current = self.frame_for_position(audio.position().as_seconds());
        } else {
            self.source = SyncSource::FreeRunning;
            self.advance_free_running(elapsed);
        }

        if !self.shown || self.current != previous {
            self.shown = true;
            tracing::trace!(frame = self.current, "sync redraw");
            SyncDecision::Redraw(self.current)
        } else {
            SyncDecision::Hold
        }
    }

    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)] // period_us ≥ 1; modulo keeps the sum below 2 * frame_count
    fn advance_free_running(&mut self, elapsed_us: u64) {
        let total = self.carry_us.saturating_add(elapsed_us);
        let frames = total / self.period_us;
        self.carry_us = total % self.period_us;
        let count = self.config.frame_count as u64;
        let step = (frames % count) as usize;
        self.current = (self.current + step) % self.config.frame_count;
    }

    /// Back to frame 0 with nothing on screen.
    pub fn reset(&mut self) {
        self.current = 0;
        self.shown = false;
        self.last_poll_us = None;
        self.carry_us = 0;
        self.source = SyncSource::FreeRunning;
    }

    /// Frame selected by the last poll.
    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Clock that drove the last poll.
    pub fn source(&self) -> SyncSource {
        self.source
    }

    /// Active configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}
