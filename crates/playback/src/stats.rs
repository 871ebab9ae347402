//! Decode/draw timing, for the debug overlay and benchmarks on hardware.

use heapless::Deque;

/// Decode times kept by [`DecodeHistory`].
pub const HISTORY_LEN: usize = 16;

/// Timing of the most recently drawn frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Frame that was drawn.
    pub index: usize,
    /// Microseconds spent inside decode steps, summed over ticks (includes
    /// any delta catch-up frames).
    pub decode_us: u64,
    /// Microseconds spent in the sink's blit.
    pub draw_us: u64,
    /// Frames decoded to produce this one (1 without catch-up).
    pub decoded_frames: usize,
}

/// Rolling window of recent decode times.
#[derive(Debug, Clone, Default)]
pub struct DecodeHistory {
    samples: Deque<u64, HISTORY_LEN>,
}

impl DecodeHistory {
    /// Empty history.
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Record a decode time, evicting the oldest when full.
    pub fn record(&mut self, decode_us: u64) {
        if self.samples.is_full() {
            let _ = self.samples.pop_front();
        }
        let _ = self.samples.push_back(decode_us);
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` before the first frame.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean decode time, `None` before the first frame.
    #[allow(clippy::arithmetic_side_effects)] // len ≤ HISTORY_LEN, non-zero here
    pub fn mean_decode_us(&self) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }
        let total = self
            .samples
            .iter()
            .fold(0u64, |sum, &us| sum.saturating_add(us));
        Some(total / self.samples.len() as u64)
    }

    /// Slowest decode in the window.
    pub fn max_decode_us(&self) -> Option<u64> {
        self.samples.iter().copied().max()
    }
}
