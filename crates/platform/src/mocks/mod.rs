//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use embedded_graphics::prelude::*;
use thiserror::Error;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::{AudioClock, FrameSink, Monotonic, PlaybackPosition};

/// Largest bitmap a [`MockFrameSink`] keeps a copy of (bytes).
pub const MOCK_BITMAP_CAPACITY: usize = 1024;

/// Blits remembered by a [`MockFrameSink`].
pub const MOCK_BLIT_HISTORY: usize = 64;

/// Mock audio subsystem
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAudioClock {
    playing: bool,
    position: PlaybackPosition,
}

impl MockAudioClock {
    /// Create a stopped clock at position 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Playing, at `seconds` into the track
    pub fn playing_at(seconds: f64) -> Self {
        Self {
            playing: true,
            position: PlaybackPosition::Seconds(seconds),
        }
    }

    /// Start or stop playback
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Jump to `seconds`
    pub fn seek(&mut self, seconds: f64) {
        self.position = PlaybackPosition::Seconds(seconds);
    }

    /// Report the position as a sample count
    pub fn set_samples(&mut self, played: u64, sample_rate: u32) {
        self.position = PlaybackPosition::Samples {
            played,
            sample_rate,
        };
    }
}

impl AudioClock for MockAudioClock {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn position(&self) -> PlaybackPosition {
        self.position
    }
}

/// Mock microsecond clock, advanced by hand
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMonotonic {
    now_us: u64,
}

impl MockMonotonic {
    /// Create a clock reading 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance_us(&mut self, us: u64) {
        self.now_us = self.now_us.saturating_add(us);
    }

    /// Move time forward by whole milliseconds
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance_us(ms.saturating_mul(1_000));
    }
}

impl Monotonic for MockMonotonic {
    fn now_us(&self) -> u64 {
        self.now_us
    }
}

/// One call to [`MockFrameSink::blit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitRecord {
    /// Bitmap size in pixels
    pub size: Size,
    /// Top-left corner
    pub origin: Point,
    /// Bitmap length in bytes
    pub len: usize,
}

/// Error injected by [`MockFrameSink::fail_next_blit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("injected blit failure")]
pub struct MockSinkError;

/// Mock display sink
///
/// Records every blit and keeps a copy of the most recent bitmap.
pub struct MockFrameSink {
    size: Size,
    blits: heapless::Vec<BlitRecord, MOCK_BLIT_HISTORY>,
    last_bitmap: heapless::Vec<u8, MOCK_BITMAP_CAPACITY>,
    fail_next: bool,
}

impl MockFrameSink {
    /// Create a sink of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            blits: heapless::Vec::new(),
            last_bitmap: heapless::Vec::new(),
            fail_next: false,
        }
    }

    /// Get blit count
    pub fn blit_count(&self) -> usize {
        self.blits.len()
    }

    /// Get recorded blits, oldest first
    pub fn blits(&self) -> &[BlitRecord] {
        &self.blits
    }

    /// Most recent bitmap (empty if none fit [`MOCK_BITMAP_CAPACITY`])
    pub fn last_bitmap(&self) -> &[u8] {
        &self.last_bitmap
    }

    /// Make the next blit fail with [`MockSinkError`]
    pub fn fail_next_blit(&mut self) {
        self.fail_next = true;
    }
}

impl Default for MockFrameSink {
    fn default() -> Self {
        Self::new(u32::from(SCREEN_WIDTH), u32::from(SCREEN_HEIGHT))
    }
}

impl FrameSink for MockFrameSink {
    type Error = MockSinkError;

    fn size(&self) -> Size {
        self.size
    }

    fn blit(&mut self, bitmap: &[u8], size: Size, origin: Point) -> Result<(), Self::Error> {
        if core::mem::take(&mut self.fail_next) {
            return Err(MockSinkError);
        }
        // Store blits for verification
        if self.blits.len() < self.blits.capacity() {
            let _ = self.blits.push(BlitRecord {
                size,
                origin,
                len: bitmap.len(),
            });
        }
        self.last_bitmap.clear();
        if self.last_bitmap.extend_from_slice(bitmap).is_err() {
            self.last_bitmap.clear();
        }
        Ok(())
    }
}
