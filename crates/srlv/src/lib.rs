//! SRLV frame decoder
//!
//! Decodes the compressed 1-bit-per-pixel video frames played on the
//! 128×64 OLED panel in sync with the audio track. Each compressed frame is a
//! one-byte [`Mode`] tag followed by an entropy-coded payload; every
//! decoded frame of a sequence has the same fixed size
//! ([`FrameGeometry::frame_len`]).
//!
//! # Pipeline
//!
//! ```text
//! compressed bytes
//!         ↓
//! mode tag (byte 0) ──────── Mode::try_from
//!         ↓
//! base decode ──────────── run-length | differential (+ integration)
//!         ↓
//! post-transform ─────────── none | delta (XOR previous) | snake
//!         ↓
//! packed bitmap (row-major, LSB-first, 1 = white)
//! ```
//!
//! # Entry points
//!
//! - [`decode`] / [`decode_with`]: decode a frame into a caller buffer
//! - [`decode_frame`]: decode into a fresh [`FrameBuffer`]
//! - [`DecodeJob`]: the same decode, sliced into bounded steps so a
//!   cooperative scheduler can interleave it with audio work
//!
//! # Features
//!
//! - `std`: `std::error::Error` impls via thiserror's std support
//! - `serde`: (de)serialise [`FrameGeometry`] and [`DecoderConfig`]
//! - `defmt`: `defmt::Format` on all public types
//!
//! # Example
//!
//! ```
//! use srlv::{decode, FrameGeometry};
//!
//! let geometry = FrameGeometry::new(8, 1).unwrap();
//! let mut out = [0u8; 1];
//! decode(&[0x00, 0x05, 0x83], geometry, None, &mut out).unwrap();
//! assert_eq!(out, [0x1F]);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod bit_writer;
pub mod config;
pub mod decode;
pub mod differential;
pub mod error;
pub mod geometry;
pub mod job;
pub mod mode;
pub mod run_length;
pub mod transform;

pub use bit_writer::{BitWriter, WriterState};
pub use config::{DecoderConfig, OverrunPolicy};
pub use decode::{decode, decode_frame, decode_with, FrameBuffer};
pub use error::{DecodeError, GeometryError};
pub use geometry::{FrameGeometry, MAX_FRAME_BYTES};
pub use job::{DecodeJob, DecodeReport, Progress};
pub use mode::{Family, Mode, Transform};
pub use transform::{apply_delta, apply_snake};
