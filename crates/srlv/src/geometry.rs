//! Fixed frame dimensions shared by every frame of a sequence.

use crate::error::GeometryError;

/// Upper bound for a packed frame, in bytes.
///
/// 64 KiB covers an 800×480 panel (48 000 bytes).
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

/// Pixel dimensions of a video sequence.
///
/// The decoded bitmap is row-major, one bit per pixel, with every row padded
/// to a whole number of bytes. The entropy-coded stream covers that padded
/// storage, so the decoded size is always `bytes_per_row() * height()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGeometry"))]
pub struct FrameGeometry {
    width: u16,
    height: u16,
}

impl FrameGeometry {
    /// Create a geometry, rejecting empty or oversized frames.
    ///
    /// # Errors
    ///
    /// [`GeometryError::ZeroDimension`] for a zero width or height,
    /// [`GeometryError::TooLarge`] when the packed frame exceeds
    /// [`MAX_FRAME_BYTES`].
    pub const fn new(width: u16, height: u16) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::ZeroDimension);
        }
        // u16 × u16 / 8 always fits in usize on 32-bit and wider targets.
        let bytes = (width as usize).div_ceil(8) * height as usize;
        if bytes > MAX_FRAME_BYTES {
            return Err(GeometryError::TooLarge {
                bytes,
                max: MAX_FRAME_BYTES,
            });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels (rows).
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Storage bytes per row: `ceil(width / 8)`.
    pub const fn bytes_per_row(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Packed frame size in bytes: `bytes_per_row() * height()`.
    pub const fn frame_len(&self) -> usize {
        self.bytes_per_row() * self.height as usize
    }

    /// Visible pixel count, `width * height`.
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGeometry {
    width: u16,
    height: u16,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGeometry> for FrameGeometry {
    type Error = GeometryError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}
