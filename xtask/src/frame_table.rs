//! xtask frame-table: generate the Rust frame table for a sequence.
//!
//! Reads a directory of compressed frames and writes a source file holding
//! them as `static` byte arrays plus a `FrameTable` constructor. Byte-identical
//! frames (held stills are common) are stored once and referenced repeatedly.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use playback::FrameTable;
use srlv::{FrameGeometry, Mode};

use crate::frames::{self, FrameFile};

/// Hex bytes per generated line.
const BYTES_PER_LINE: usize = 16;

pub fn run(dir: &Path, width: u16, height: u16, fps: f64, out: &Path) -> Result<()> {
    println!();
    println!("{}", "🎞  Generating frame table...".cyan().bold());
    println!();

    let geometry = frames::geometry(width, height)?;
    let frames = frames::load_dir(dir)?;
    let generated = generate(&frames, geometry, fps)?;

    std::fs::write(out, &generated.source)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    let delta = frames
        .iter()
        .filter(|f| f.mode().is_some_and(Mode::needs_reference))
        .count();
    println!("  {delta} of {} frames are delta frames", frames.len());
    println!(
        "{}",
        format!(
            "✓ {} frames ({} unique, {} bytes) written to {}",
            frames.len(),
            generated.unique,
            generated.bytes,
            out.display()
        )
        .green()
    );
    println!();
    Ok(())
}

pub(crate) struct Generated {
    pub source: String,
    /// Distinct frames stored.
    pub unique: usize,
    /// Compressed bytes stored after sharing.
    pub bytes: usize,
}

/// Validate `frames` as a sequence and render the table source.
pub(crate) fn generate(frames: &[FrameFile], geometry: FrameGeometry, fps: f64) -> Result<Generated> {
    let slices: Vec<&[u8]> = frames.iter().map(|f| f.bytes.as_slice()).collect();
    FrameTable::new(geometry, fps, slices.as_slice())
        .validate()
        .context("Frame sequence is not playable")?;
    if !(fps.is_finite() && fps > 0.0) {
        anyhow::bail!("Frame rate must be positive, got {fps}");
    }

    // Index of each frame's shared storage, in first-seen order.
    let mut seen: HashMap<&[u8], usize> = HashMap::new();
    let mut unique: Vec<&[u8]> = Vec::new();
    let mut order = Vec::with_capacity(frames.len());
    for &bytes in &slices {
        let slot = *seen.entry(bytes).or_insert_with(|| {
            unique.push(bytes);
            unique.len().saturating_sub(1)
        });
        order.push(slot);
    }

    let mut source = String::new();
    writeln!(source, "// @generated by `cargo xtask frame-table`. Do not edit.")?;
    writeln!(source, "// {} frames, {} unique.", frames.len(), unique.len())?;
    writeln!(source)?;
    writeln!(source, "use playback::FrameTable;")?;
    writeln!(source, "use srlv::{{FrameGeometry, GeometryError}};")?;
    writeln!(source)?;
    writeln!(source, "pub const WIDTH: u16 = {};", geometry.width())?;
    writeln!(source, "pub const HEIGHT: u16 = {};", geometry.height())?;
    writeln!(source, "pub const FRAME_RATE: f64 = {fps:?};")?;
    writeln!(source, "pub const FRAME_LEN: usize = {};", geometry.frame_len())?;

    for (slot, bytes) in unique.iter().enumerate() {
        writeln!(source)?;
        writeln!(source, "static FRAME_{slot}: [u8; {}] = [", bytes.len())?;
        for line in bytes.chunks(BYTES_PER_LINE) {
            let hex: Vec<String> = line.iter().map(|b| format!("0x{b:02X}")).collect();
            writeln!(source, "    {},", hex.join(", "))?;
        }
        writeln!(source, "];")?;
    }

    writeln!(source)?;
    writeln!(source, "pub static FRAMES: [&[u8]; {}] = [", order.len())?;
    for slot in &order {
        writeln!(source, "    &FRAME_{slot},")?;
    }
    writeln!(source, "];")?;
    writeln!(source)?;
    writeln!(source, "pub fn table() -> Result<FrameTable<'static>, GeometryError> {{")?;
    writeln!(
        source,
        "    Ok(FrameTable::new(FrameGeometry::new(WIDTH, HEIGHT)?, FRAME_RATE, &FRAMES))"
    )?;
    writeln!(source, "}}")?;

    Ok(Generated {
        source,
        unique: unique.len(),
        bytes: unique.iter().map(|b| b.len()).sum(),
    })
}
