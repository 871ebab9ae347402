//! Audio-synchronised video playback
//!
//! Plays a pre-compressed SRLV [`FrameTable`] on a small monochrome panel,
//! locked to the audio track when one is playing and free-running on the
//! scheduler clock otherwise.
//!
//! # Architecture
//!
//! ```text
//! Scheduler tick ──► VideoPlayer::tick(audio, clock, sink, budget)
//!                      │
//!                      ├─ PlaybackSynchronizer::poll  → Redraw(i) / Hold
//!                      ├─ srlv::DecodeJob::step       → Pending / Complete
//!                      └─ FrameSink::blit              (centred, y = 0)
//! ```
//!
//! Everything is `no_std` and allocation-free: the player owns two
//! fixed-size frame buffers and borrows the table from flash.
//!
//! # Features
//!
//! - `std`: forward `std` to the codec and platform crates
//! - `serde`: (de)serialise [`PlayerConfig`] and [`SyncConfig`]
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
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod frame_table;
pub mod player;
pub mod stats;
pub mod sync;

pub use config::{ConfigError, PlayerConfig, SyncConfig};
pub use frame_table::{FrameTable, TableError};
pub use player::{centred, PlayerError, TickOutcome, VideoPlayer};
pub use stats::{DecodeHistory, FrameStats};
pub use sync::{PlaybackSynchronizer, SyncDecision, SyncSource};
