//! Platform abstractions for the `SoulAudio` video player
//!
//! The decode/playback core never talks to hardware directly. It consumes
//! three collaborators, each behind a trait so the same core runs on the
//! device, in the desktop emulator and in host tests.
//!
//! # Architecture Layers
//!
//! ```text
//! Scheduler (firmware main loop)
//!         ↓
//! playback (VideoPlayer / PlaybackSynchronizer)
//!         ↓
//! srlv (frame codec)      platform (this crate - trait abstractions)
//!                                 ↓
//!                         Audio DMA / timer / display driver
//! ```
//!
//! # Collaborators
//!
//! - [`AudioClock`] - is audio playing, and how far in
//! - [`Monotonic`] - microsecond wall clock of the scheduler
//! - [`FrameSink`] - accepts a packed 1-bpp bitmap for blitting
//!
//! [`DrawTargetSink`] adapts any `embedded-graphics` binary draw target into
//! a [`FrameSink`].
//!
//! # Features
//!
//! - `std`: expose [`mocks`] to other crates' tests
//! - `defmt`: Enable defmt logging

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio;
pub mod config;
pub mod display;
pub mod mocks;
pub mod time;

pub use audio::{AudioClock, PlaybackPosition};
pub use display::{packed_len, BlitError, DrawTargetSink, FrameSink};
pub use time::Monotonic;
