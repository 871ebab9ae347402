//! xtask simulate: play a frame sequence through `VideoPlayer` on the host.
//!
//! Drives the real player with a simulated scheduler: one tick every
//! `tick_ms` of simulated time, against either a playing audio track or the
//! free-running clock. Player events go to a `tracing-subscriber` formatter
//! (filter with `RUST_LOG`, e.g. `RUST_LOG=playback=trace`).

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use platform::config::{APP_NAME, APP_VERSION, VIDEO_HEIGHT, VIDEO_WIDTH};
use platform::mocks::{MockAudioClock, MockFrameSink};
use platform::Monotonic;
use playback::{FrameTable, PlayerConfig, TickOutcome, VideoPlayer};
use tracing_subscriber::EnvFilter;

use crate::frames;
use crate::render::save_frame;

/// Decoded size of the device's video frames.
#[allow(clippy::arithmetic_side_effects)]
const FRAME_LEN: usize = (VIDEO_WIDTH as usize).div_ceil(8) * VIDEO_HEIGHT as usize;

pub struct SimulateArgs<'a> {
    pub dir: &'a Path,
    pub fps: f64,
    pub seconds: f64,
    pub tick_ms: u64,
    pub budget: usize,
    pub audio: bool,
    pub snapshot: Option<&'a Path>,
}

/// Simulated scheduler time plus the real time spent since the tick began,
/// so decode timings are genuine while playback stays deterministic.
struct SimClock {
    base_us: u64,
    tick_started: Instant,
}

impl SimClock {
    fn new() -> Self {
        Self {
            base_us: 0,
            tick_started: Instant::now(),
        }
    }

    fn advance(&mut self, us: u64) {
        self.base_us = self.base_us.saturating_add(us);
        self.tick_started = Instant::now();
    }
}

impl Monotonic for SimClock {
    fn now_us(&self) -> u64 {
        let real = u64::try_from(self.tick_started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.base_us.saturating_add(real)
    }
}

#[derive(Default)]
struct Tally {
    drawn: usize,
    decoding: usize,
    idle: usize,
    errors: usize,
}

pub fn run(args: &SimulateArgs<'_>) -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("playback=debug")),
        )
        .try_init();

    println!();
    println!(
        "{}",
        format!("▶  Simulating playback ({APP_NAME} {APP_VERSION})...").cyan().bold()
    );
    println!();

    let geometry = frames::geometry(VIDEO_WIDTH, VIDEO_HEIGHT)?;
    let files = frames::load_dir(args.dir)?;
    let slices: Vec<&[u8]> = files.iter().map(|f| f.bytes.as_slice()).collect();
    let table = FrameTable::new(geometry, args.fps, slices.as_slice());
    let mut player = VideoPlayer::<FRAME_LEN>::new(table, PlayerConfig::default())
        .context("Cannot play this sequence")?;

    let mut audio = if args.audio {
        MockAudioClock::playing_at(0.0)
    } else {
        MockAudioClock::new()
    };
    let mut clock = SimClock::new();
    let mut sink = MockFrameSink::default();
    let mut tally = Tally::default();

    let tick_us = args.tick_ms.max(1).saturating_mul(1_000);
    let start = Instant::now();
    let mut elapsed_us: u64 = 0;
    while (elapsed_us as f64) / 1e6 < args.seconds {
        if args.audio {
            audio.seek(elapsed_us as f64 / 1e6);
        }
        match player.tick(&audio, &clock, &mut sink, args.budget) {
            Ok(TickOutcome::Drawn(_)) => tally.drawn = tally.drawn.saturating_add(1),
            Ok(TickOutcome::Decoding) => tally.decoding = tally.decoding.saturating_add(1),
            Ok(TickOutcome::Idle) => tally.idle = tally.idle.saturating_add(1),
            Err(e) => {
                tally.errors = tally.errors.saturating_add(1);
                eprintln!("{}", format!("  ✗ {e}").red());
            }
        }
        elapsed_us = elapsed_us.saturating_add(tick_us);
        clock.advance(tick_us);
    }

    if let (Some(path), Some((index, frame))) = (args.snapshot, player.current_frame()) {
        save_frame(frame, geometry, path)?;
        println!("  Frame {index} saved to {}", path.display());
    }

    println!("  Frames drawn:    {}", tally.drawn);
    println!("  Decoding ticks:  {}", tally.decoding);
    println!("  Idle ticks:      {}", tally.idle);
    if let (Some(mean), Some(max)) = (
        player.history().mean_decode_us(),
        player.history().max_decode_us(),
    ) {
        println!("  Decode time:     mean {mean} µs, max {max} µs");
    }
    if let Some(stats) = player.last_stats() {
        println!("  Last blit:       {} µs", stats.draw_us);
    }
    println!();

    if tally.errors > 0 {
        anyhow::bail!("{} ticks failed", tally.errors);
    }
    println!(
        "{}",
        format!(
            "✓ Simulated {:.1}s of playback in {:.2}s",
            args.seconds,
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}
