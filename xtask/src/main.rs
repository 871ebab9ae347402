// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod doc;
mod frame_table;
mod frames;
mod render;
mod simulate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "SoulAudio video player development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the no_std crates for the device target, plus clippy and fmt
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Build and optionally open documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
        /// Include private items
        #[arg(long)]
        private: bool,
    },
    /// Decode compressed frames (delta chained, in the order given) into PNG images
    Render {
        /// Frame width in pixels
        #[arg(long, default_value_t = platform::config::VIDEO_WIDTH)]
        width: u16,
        /// Frame height in pixels
        #[arg(long, default_value_t = platform::config::VIDEO_HEIGHT)]
        height: u16,
        /// Output directory for the .png files
        #[arg(long, default_value = "target/render")]
        out: PathBuf,
        /// Clip overlong frames instead of failing
        #[arg(long)]
        lenient: bool,
        /// Compressed frame files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Generate a Rust frame table from a directory of .srlv frames
    FrameTable {
        /// Directory of compressed frames, played in file-name order
        #[arg(long)]
        dir: PathBuf,
        /// Frame width in pixels
        #[arg(long, default_value_t = platform::config::VIDEO_WIDTH)]
        width: u16,
        /// Frame height in pixels
        #[arg(long, default_value_t = platform::config::VIDEO_HEIGHT)]
        height: u16,
        /// Nominal frames per second
        #[arg(long, default_value_t = platform::config::VIDEO_FPS)]
        fps: f64,
        /// Generated Rust source file
        #[arg(long)]
        out: PathBuf,
    },
    /// Play a directory of .srlv frames through the player with simulated clocks
    Simulate {
        /// Directory of compressed frames, played in file-name order
        #[arg(long)]
        dir: PathBuf,
        /// Nominal frames per second
        #[arg(long, default_value_t = platform::config::VIDEO_FPS)]
        fps: f64,
        /// Simulated playback length in seconds
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,
        /// Scheduler tick period in milliseconds
        #[arg(long, default_value_t = 10)]
        tick_ms: u64,
        /// Decode work units per tick
        #[arg(long, default_value_t = 64)]
        budget: usize,
        /// Follow a playing audio track instead of free-running
        #[arg(long)]
        audio: bool,
        /// Save the last frame on screen as an image (format from the extension, e.g. .png)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Doc { open, private } => doc::run(open, private),
        Commands::Render {
            width,
            height,
            out,
            lenient,
            files,
        } => render::run(width, height, &out, &files, lenient),
        Commands::FrameTable {
            dir,
            width,
            height,
            fps,
            out,
        } => frame_table::run(&dir, width, height, fps, &out),
        Commands::Simulate {
            dir,
            fps,
            seconds,
            tick_ms,
            budget,
            audio,
            snapshot,
        } => simulate::run(&simulate::SimulateArgs {
            dir: &dir,
            fps,
            seconds,
            tick_ms,
            budget,
            audio,
            snapshot: snapshot.as_deref(),
        }),
    }
}
