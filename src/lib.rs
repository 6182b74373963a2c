//! Sprite slicer: cut a fixed-grid sprite sheet into one image file per cell.
//!
//! # Pipeline
//!
//! Load sheet → check the grid fits → for each cell in row-major order:
//! crop → encode → write `{prefix}_{row}_{col}.{ext}`.
//!
//! - **Grid**: [`GridSpec`] holds cell size and cell counts; it never looks at
//!   the image to guess them
//! - **Codec**: [`RasterCodec`] hides the imaging library; [`ImageCodec`] uses
//!   the `image` crate
//! - **Slicer**: [`SpriteSlicer`] runs the loop and reports what it wrote

pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod slicer;

pub use codec::{ImageCodec, OutputFormat, RasterCodec};
pub use config::{OutputConfig, SlicerConfig};
pub use error::{Result, SliceError};
pub use grid::{GridCell, GridSpec, Rect, bounding_box};
pub use slicer::{
    IconTile, OutputArtifact, SliceReport, SourceImage, SpriteSlicer, artifact_file_name,
    write_manifest,
};
