//! Application configuration and constants
//!
//! Central values for the video player. Everything that depends on the
//! panel or on the bundled animation should reference these constants
//! rather than hardcoding values.

/// The application name
pub const APP_NAME: &str = "SRLV Player";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Panel width in pixels (SSD1306 128×64 OLED)
pub const SCREEN_WIDTH: u16 = 128;

/// Panel height in pixels
pub const SCREEN_HEIGHT: u16 = 64;

/// Width of the bundled animation in pixels
pub const VIDEO_WIDTH: u16 = 80;

/// Height of the bundled animation in pixels (full panel height)
pub const VIDEO_HEIGHT: u16 = 64;

/// Frame rate the bundled animation was sampled at
pub const VIDEO_FPS: f64 = 2.0;
