//! Display sink abstraction
//!
//! The video player hands over whole decoded frames: a packed 1-bpp bitmap,
//! row-major, `ceil(width / 8)` bytes per row, bit 0 of each byte is the
//! leftmost pixel (XBM order) and a set bit is white. No partial-frame
//! streaming.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use thiserror::Error;

/// Destination for decoded frames.
pub trait FrameSink {
    /// Error type for blit operations
    type Error: core::fmt::Debug;

    /// Drawable area in pixels, used to centre frames.
    fn size(&self) -> Size;

    /// Draw `bitmap` (`size` pixels, packed as described in the module docs)
    /// with its top-left corner at `origin`.
    fn blit(&mut self, bitmap: &[u8], size: Size, origin: Point) -> Result<(), Self::Error>;
}

/// Packed bitmap length for `size`: `ceil(width / 8) * height`.
#[allow(clippy::cast_possible_truncation)] // u32 → usize on 32/64-bit targets
pub fn packed_len(size: Size) -> usize {
    (size.width as usize)
        .div_ceil(8)
        .saturating_mul(size.height as usize)
}

/// Errors from [`DrawTargetSink::blit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlitError<E> {
    /// The bitmap does not match the declared size.
    #[error("bitmap is {actual} bytes, expected {expected}")]
    Bitmap {
        /// `packed_len(size)`
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
    /// The underlying draw target failed.
    #[error("draw target error: {0:?}")]
    Target(E),
}

/// [`FrameSink`] over any `embedded-graphics` binary draw target.
///
/// White pixels map to [`BinaryColor::On`].
pub struct DrawTargetSink<D> {
    target: D,
}

impl<D> DrawTargetSink<D> {
    /// Wrap a draw target.
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Borrow the wrapped target.
    pub fn inner(&self) -> &D {
        &self.target
    }

    /// Mutably borrow the wrapped target (e.g. to trigger a refresh).
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Unwrap the draw target.
    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> FrameSink for DrawTargetSink<D>
where
    D: DrawTarget<Color = BinaryColor>,
    D::Error: core::fmt::Debug,
{
    type Error = BlitError<D::Error>;

    fn size(&self) -> Size {
        self.target.bounding_box().size
    }

    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)] // x / 8 and x % 8 by a constant
    fn blit(&mut self, bitmap: &[u8], size: Size, origin: Point) -> Result<(), Self::Error> {
        let expected = packed_len(size);
        if bitmap.len() != expected {
            return Err(BlitError::Bitmap {
                expected,
                actual: bitmap.len(),
            });
        }
        let width = size.width as usize;
        let stride = width.div_ceil(8).max(1);
        let colors = bitmap.chunks(stride).flat_map(move |row| {
            (0..width).map(move |x| {
                let set = row.get(x / 8).is_some_and(|byte| (byte >> (x % 8)) & 1 != 0);
                if set {
                    BinaryColor::On
                } else {
                    BinaryColor::Off
                }
            })
        });
        self.target
            .fill_contiguous(&Rectangle::new(origin, size), colors)
            .map_err(BlitError::Target)
    }
}
