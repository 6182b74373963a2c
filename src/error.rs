//! Error types for the sprite slicer.

use std::path::PathBuf;

/// Top-level error type for slicing runs.
#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    /// Source sheet missing, unreadable, or not a decodable image.
    #[error("failed to load {}: {reason}", path.display())]
    Load {
        /// Path of the sheet that could not be loaded.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// The grid does not fit inside the source sheet.
    #[error(
        "sheet is {actual_width}x{actual_height} but the grid needs at least \
         {required_width}x{required_height}"
    )]
    Geometry {
        /// Source width in pixels.
        actual_width: u32,
        /// Source height in pixels.
        actual_height: u32,
        /// `columns * cell_width`, or the right edge of the offending rectangle.
        required_width: u32,
        /// `rows * cell_height`, or the lower edge of the offending rectangle.
        required_height: u32,
    },

    /// A tile could not be encoded or written.
    #[error("failed to write {}: {reason}", path.display())]
    Write {
        /// Destination path of the tile.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Codec-level failure not tied to a file (decode of raw bytes, bad crop).
    #[error("codec error: {0}")]
    Codec(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SliceError>;
