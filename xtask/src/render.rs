//! xtask render: decode compressed frames into PNG images.
//!
//! Frames are decoded in the order given, each delta frame against the one
//! before it, exactly as the player would. The first file has nothing before
//! it, so it must be a keyframe. Output is 8-bit grayscale PNG for comparing
//! against reference renders.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use image::{GrayImage, Luma};
use srlv::{decode_with, DecoderConfig, FrameGeometry};

use crate::frames::{self, FrameFile};

pub fn run(width: u16, height: u16, out_dir: &Path, files: &[PathBuf], lenient: bool) -> Result<()> {
    println!();
    println!("{}", "🖼  Rendering frames...".cyan().bold());
    println!();

    let start = Instant::now();
    let geometry = frames::geometry(width, height)?;
    let config = if lenient {
        DecoderConfig::lenient()
    } else {
        DecoderConfig::strict()
    };
    let frames = files
        .iter()
        .map(|path| FrameFile::read(path))
        .collect::<Result<Vec<_>>>()?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let written = render_all(&frames, geometry, config, out_dir)?;

    println!(
        "{}",
        format!(
            "✓ Rendered {} frames to {} in {:.2}s",
            written.len(),
            out_dir.display(),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}

/// Decode `frames` in sequence and write one PNG per frame into `out_dir`.
pub(crate) fn render_all(
    frames: &[FrameFile],
    geometry: FrameGeometry,
    config: DecoderConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut current = vec![0u8; geometry.frame_len()];
    let mut previous = vec![0u8; geometry.frame_len()];
    let mut written = Vec::with_capacity(frames.len());

    for (index, frame) in frames.iter().enumerate() {
        let reference = (index > 0).then_some(previous.as_slice());
        let report = decode_with(&frame.bytes, geometry, reference, &mut current, config)
            .with_context(|| format!("Failed to decode {}", frame.path.display()))?;
        if report.dropped_bits > 0 {
            println!(
                "{}",
                format!(
                    "  ⚠ {}: {} bits past the frame were dropped",
                    frame.path.display(),
                    report.dropped_bits
                )
                .yellow()
            );
        }

        let stem = frame
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .map_or_else(|| format!("{index:04}"), str::to_owned);
        let path = out_dir.join(format!("{stem}.png"));
        save_frame(&current, geometry, &path)?;
        written.push(path);

        std::mem::swap(&mut current, &mut previous);
    }
    Ok(written)
}

/// Expand a decoded frame to one grayscale byte per pixel.
///
/// Decoded frames are LSB-first with 1 = white; row padding bits are dropped.
#[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)] // pixel coords stay inside the frame
pub(crate) fn to_image(frame: &[u8], geometry: FrameGeometry) -> GrayImage {
    let width = u32::from(geometry.width());
    let height = u32::from(geometry.height());
    let stride = usize::from(geometry.width()).div_ceil(8);
    GrayImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let byte = frame.get(y * stride + x / 8).copied().unwrap_or(0);
        if (byte >> (x % 8)) & 1 != 0 {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Write a decoded frame to `path`; the format follows the extension.
pub(crate) fn save_frame(frame: &[u8], geometry: FrameGeometry, path: &Path) -> Result<()> {
    to_image(frame, geometry)
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
