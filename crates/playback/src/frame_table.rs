//! Build-time frame table.
//!
//! A video sequence is an ordered list of compressed frames plus the shared
//! geometry and frame rate. Tables are generated ahead of time (see
//! `cargo xtask frame-table`) and live in flash as `static` data; identical
//! frames share one byte array.

use srlv::{FrameGeometry, Mode};
use thiserror::Error;

use crate::config::{PlayerConfig, SyncConfig};

/// Problems found by [`FrameTable::validate`] or a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// The table has no frames.
    #[error("frame table is empty")]
    Empty,
    /// A frame has no bytes, not even a mode tag.
    #[error("frame {index} is empty")]
    EmptyFrame {
        /// Offending frame.
        index: usize,
    },
    /// A frame starts with an unknown mode tag.
    #[error("frame {index} has unknown mode tag {tag:#04x}")]
    UnknownMode {
        /// Offending frame.
        index: usize,
        /// Its first byte.
        tag: u8,
    },
    /// Frame 0 is a delta frame, so no reference can ever exist for it.
    #[error("first frame is a delta frame")]
    DeltaFirstFrame,
    /// Index past the end of the table.
    #[error("frame {index} out of range for {len} frames")]
    OutOfRange {
        /// Requested frame.
        index: usize,
        /// Table length.
        len: usize,
    },
}

/// Compressed frames of one sequence.
#[derive(Debug, Clone, Copy)]
pub struct FrameTable<'a> {
    /// Dimensions shared by every frame.
    pub geometry: FrameGeometry,
    /// Nominal frames per second.
    pub frame_rate: f64,
    /// Compressed frames in display order.
    pub frames: &'a [&'a [u8]],
}

impl<'a> FrameTable<'a> {
    /// Bundle a generated table.
    pub const fn new(geometry: FrameGeometry, frame_rate: f64, frames: &'a [&'a [u8]]) -> Self {
        Self {
            geometry,
            frame_rate,
            frames,
        }
    }

    /// Number of frames.
    pub const fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when the table has no frames.
    pub const fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Compressed bytes of frame `index`.
    ///
    /// # Errors
    ///
    /// [`TableError::OutOfRange`] past the end.
    pub fn frame(&self, index: usize) -> Result<&'a [u8], TableError> {
        self.frames
            .get(index)
            .copied()
            .ok_or(TableError::OutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Mode of frame `index`, if it exists and is well formed.
    pub fn mode(&self, index: usize) -> Option<Mode> {
        let tag = *self.frames.get(index)?.first()?;
        Mode::try_from(tag).ok()
    }

    /// Check that every frame can be decoded in sequence.
    ///
    /// # Errors
    ///
    /// The first problem found, scanning from frame 0.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.frames.is_empty() {
            return Err(TableError::Empty);
        }
        for (index, frame) in self.frames.iter().enumerate() {
            let Some(&tag) = frame.first() else {
                return Err(TableError::EmptyFrame { index });
            };
            let mode = Mode::try_from(tag).map_err(|_| TableError::UnknownMode { index, tag })?;
            if index == 0 && mode.needs_reference() {
                return Err(TableError::DeltaFirstFrame);
            }
        }
        Ok(())
    }

    /// Synchroniser settings for this table.
    pub fn sync_config(&self, player: &PlayerConfig) -> SyncConfig {
        SyncConfig {
            frame_rate: self.frame_rate,
            drift_correction: player.drift_correction,
            frame_count: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_A: &[u8] = &[0x00, 0x05, 0x83];
    const FRAME_B: &[u8] = &[0x01, 0x00];

    fn geometry() -> FrameGeometry {
        FrameGeometry::new(8, 1).expect("valid geometry")
    }

    #[test]
    fn test_valid_table() {
        let frames: &[&[u8]] = &[FRAME_A, FRAME_B, FRAME_A];
        let table = FrameTable::new(geometry(), 2.0, frames);
        assert_eq!(table.validate(), Ok(()));
        assert_eq!(table.len(), 3);
        assert_eq!(table.mode(1), Some(Mode::RunLengthDelta));
        assert_eq!(table.frame(2), Ok(FRAME_A));
    }

    #[test]
    fn test_empty_table() {
        let table = FrameTable::new(geometry(), 2.0, &[]);
        assert!(table.is_empty());
        assert_eq!(table.validate(), Err(TableError::Empty));
    }

    #[test]
    fn test_empty_frame_reported_with_index() {
        let frames: &[&[u8]] = &[FRAME_A, &[]];
        let table = FrameTable::new(geometry(), 2.0, frames);
        assert_eq!(table.validate(), Err(TableError::EmptyFrame { index: 1 }));
        assert_eq!(table.mode(1), None);
    }

    #[test]
    fn test_unknown_mode_reported_with_index() {
        let frames: &[&[u8]] = &[FRAME_A, FRAME_A, &[0x2A, 0x00]];
        let table = FrameTable::new(geometry(), 2.0, frames);
        assert_eq!(
            table.validate(),
            Err(TableError::UnknownMode {
                index: 2,
                tag: 0x2A
            })
        );
    }

    #[test]
    fn test_delta_first_frame_rejected() {
        let frames: &[&[u8]] = &[FRAME_B, FRAME_A];
        let table = FrameTable::new(geometry(), 2.0, frames);
        assert_eq!(table.validate(), Err(TableError::DeltaFirstFrame));
    }

    #[test]
    fn test_out_of_range_lookup() {
        let frames: &[&[u8]] = &[FRAME_A];
        let table = FrameTable::new(geometry(), 2.0, frames);
        assert_eq!(
            table.frame(5),
            Err(TableError::OutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_sync_config_uses_table_rate_and_length() {
        let frames: &[&[u8]] = &[FRAME_A, FRAME_A];
        let table = FrameTable::new(geometry(), 30.0, frames);
        let config = table.sync_config(&PlayerConfig::default());
        assert_eq!(config.frame_count, 2);
        assert!((config.frame_rate - 30.0).abs() < f64::EPSILON);
    }
}
