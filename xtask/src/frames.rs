//! Compressed frame files on disk.
//!
//! A sequence is a directory of `*.srlv` files, one compressed frame each,
//! played in file-name order (`0000.srlv`, `0001.srlv`, …).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use srlv::{FrameGeometry, Mode};
use walkdir::WalkDir;

pub const FRAME_EXTENSION: &str = "srlv";

/// One compressed frame read from disk.
pub struct FrameFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl FrameFile {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// Mode tag, if the frame has a valid one.
    pub fn mode(&self) -> Option<Mode> {
        Mode::try_from(*self.bytes.first()?).ok()
    }
}

/// Every `*.srlv` file directly inside `dir`, sorted by file name.
pub fn load_dir(dir: &Path) -> Result<Vec<FrameFile>> {
    let mut frames = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let is_frame = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(FRAME_EXTENSION));
        if is_frame {
            frames.push(FrameFile::read(entry.path())?);
        }
    }
    if frames.is_empty() {
        anyhow::bail!("No .{FRAME_EXTENSION} files in {}", dir.display());
    }
    Ok(frames)
}

pub fn geometry(width: u16, height: u16) -> Result<FrameGeometry> {
    FrameGeometry::new(width, height)
        .map_err(|e| anyhow::anyhow!("Invalid frame size {width}x{height}: {e}"))
}
