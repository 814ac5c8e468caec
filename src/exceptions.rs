//! Error types for basegfx

use std::fmt;

use crate::exit_codes::{
    EXIT_CAPACITY_ERROR, EXIT_CONFIG_ERROR, EXIT_GRF_ERROR, EXIT_IO_ERROR, EXIT_VIDEO_ERROR,
};

/// Main error type for basegfx operations.
///
/// Every variant aborts the load or switch that raised it. Degraded outcomes
/// (hash mismatches, missing files, a rolled back blitter switch) are reported
/// as values instead.
#[derive(Debug)]
pub enum GfxError {
    /// Container version tag was zero or the container is truncated
    Corrupt(String),

    /// Container declares a compression mode we have no decoder for
    UnsupportedCompression(u8),

    /// Sprite index reached the table capacity
    TooManySprites { capacity: u32 },

    /// Indexed loading ran out of sprites in the middle of a range
    IndexedRangeTruncated { filename: String, index: u32 },

    /// Neither the new nor the previous blitter could be activated
    VideoReinitFailed,

    /// A logical file name could not be resolved in any search path
    FileNotFound(String),

    /// File slot outside the pool
    InvalidSlot(usize),

    /// Set descriptor or settings are invalid
    Config(String),

    /// IO error
    IoError(std::io::Error),

    /// JSON parsing error
    JsonError(serde_json::Error),

    /// Generic error with message
    Generic(String),
}

impl GfxError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            GfxError::Corrupt(_)
            | GfxError::UnsupportedCompression(_)
            | GfxError::IndexedRangeTruncated { .. } => EXIT_GRF_ERROR,
            GfxError::TooManySprites { .. } => EXIT_CAPACITY_ERROR,
            GfxError::VideoReinitFailed => EXIT_VIDEO_ERROR,
            GfxError::FileNotFound(_) | GfxError::IoError(_) => EXIT_IO_ERROR,
            GfxError::InvalidSlot(_)
            | GfxError::Config(_)
            | GfxError::JsonError(_)
            | GfxError::Generic(_) => EXIT_CONFIG_ERROR,
        }
    }
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GfxError::Corrupt(filename) => write!(f, "Base grf '{filename}' is corrupt"),
            GfxError::UnsupportedCompression(_) => write!(f, "Unsupported compression format"),
            GfxError::TooManySprites { .. } => write!(
                f,
                "Too many sprites. Recompile with higher MAX_SPRITES value or remove some custom GRF files."
            ),
            GfxError::IndexedRangeTruncated { filename, index } => write!(
                f,
                "Base grf '{filename}' ended before sprite {index} of its replacement ranges"
            ),
            GfxError::VideoReinitFailed => write!(
                f,
                "Failed to reinitialize video driver. Specify a fixed blitter in the config"
            ),
            GfxError::FileNotFound(filename) => write!(f, "Cannot open file '{filename}'"),
            GfxError::InvalidSlot(slot) => write!(f, "File slot {slot} is out of range"),
            GfxError::Config(msg) => write!(f, "Configuration error: {msg}"),
            GfxError::IoError(err) => write!(f, "IO error: {err}"),
            GfxError::JsonError(err) => write!(f, "JSON error: {err}"),
            GfxError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GfxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GfxError::IoError(err) => Some(err),
            GfxError::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GfxError {
    fn from(err: std::io::Error) -> Self {
        GfxError::IoError(err)
    }
}

impl From<serde_json::Error> for GfxError {
    fn from(err: serde_json::Error) -> Self {
        GfxError::JsonError(err)
    }
}

impl From<anyhow::Error> for GfxError {
    fn from(err: anyhow::Error) -> Self {
        GfxError::Generic(err.to_string())
    }
}

/// Result type for basegfx operations
pub type Result<T> = std::result::Result<T, GfxError>;
