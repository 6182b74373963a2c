//! Slicing orchestration: load a sheet, crop every grid cell, write tiles.
//!
//! A run is strictly sequential. The sheet is checked against the grid before
//! any file is written, so a geometry mismatch never leaves partial output.
//! Any later failure aborts the run and leaves already written tiles in place.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::codec::{ImageCodec, OutputFormat, RasterCodec};
use crate::config::{OutputConfig, SlicerConfig};
use crate::error::{Result, SliceError};
use crate::grid::{GridCell, GridSpec, Rect};

/// A decoded sprite sheet.
#[derive(Debug, Clone)]
pub struct SourceImage<R> {
    /// Path the sheet was loaded from.
    pub path: PathBuf,
    pub raster: R,
    pub width: u32,
    pub height: u32,
}

/// One cropped cell.
#[derive(Debug, Clone)]
pub struct IconTile<R> {
    pub cell: GridCell,
    pub raster: R,
}

/// A tile file, written or planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    pub row: u32,
    pub col: u32,
    pub rect: Rect,
    pub path: PathBuf,
}

/// Outcome of a run; doubles as the JSON manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceReport {
    pub source: PathBuf,
    pub grid: GridSpec,
    pub format: OutputFormat,
    /// Artifacts in row-major order.
    pub artifacts: Vec<OutputArtifact>,
}

/// File name for the tile at (`row`, `col`): `{prefix}_{row}_{col}.{ext}`.
pub fn artifact_file_name(prefix: &str, row: u32, col: u32, format: OutputFormat) -> String {
    format!("{prefix}_{row}_{col}.{}", format.extension())
}

/// Slices sheets on a fixed grid using a [`RasterCodec`].
#[derive(Debug, Clone)]
pub struct SpriteSlicer<C = ImageCodec> {
    codec: C,
    grid: GridSpec,
    output: OutputConfig,
}

impl SpriteSlicer<ImageCodec> {
    /// Build a slicer backed by [`ImageCodec`].
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Config`] if the configuration is invalid.
    pub fn from_config(config: &SlicerConfig) -> Result<Self> {
        Self::with_codec(ImageCodec, config)
    }
}

impl<C: RasterCodec> SpriteSlicer<C> {
    /// Build a slicer with a custom codec.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Config`] if the configuration is invalid.
    pub fn with_codec(codec: C, config: &SlicerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            codec,
            grid: config.grid,
            output: config.output.clone(),
        })
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Read and decode a sprite sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Load`] if the file is missing, unreadable, or
    /// not a decodable image.
    pub fn load(&self, path: &Path) -> Result<SourceImage<C::Raster>> {
        let load_err = |reason: String| SliceError::Load {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = std::fs::read(path).map_err(|e| load_err(e.to_string()))?;
        let raster = self.codec.decode(&bytes).map_err(|e| load_err(e.to_string()))?;
        let (width, height) = self.codec.dimensions(&raster);
        tracing::info!(path = %path.display(), width, height, "loaded sprite sheet");
        Ok(SourceImage {
            path: path.to_path_buf(),
            raster,
            width,
            height,
        })
    }

    /// Check that `source` contains every cell of the grid.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Geometry`] if the sheet is too small.
    pub fn check_fits(&self, source: &SourceImage<C::Raster>) -> Result<()> {
        let (grid_width, grid_height) = self.grid.check_fits(source.width, source.height)?;
        if source.width > grid_width || source.height > grid_height {
            tracing::warn!(
                width = source.width,
                height = source.height,
                grid_width,
                grid_height,
                "sheet is larger than the grid; pixels outside it are ignored"
            );
        }
        Ok(())
    }

    /// Crop one cell out of the sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Geometry`] if the cell leaves the sheet.
    pub fn crop_tile(
        &self,
        source: &SourceImage<C::Raster>,
        cell: GridCell,
    ) -> Result<IconTile<C::Raster>> {
        if !cell.rect.fits_within(source.width, source.height) {
            return Err(SliceError::Geometry {
                actual_width: source.width,
                actual_height: source.height,
                required_width: cell.rect.right,
                required_height: cell.rect.lower,
            });
        }
        let raster = self.codec.crop(&source.raster, cell.rect)?;
        Ok(IconTile { cell, raster })
    }

    /// Destination path for the tile at (`row`, `col`).
    pub fn artifact_path(&self, row: u32, col: u32) -> PathBuf {
        self.output.dir.join(artifact_file_name(
            &self.output.prefix,
            row,
            col,
            self.output.format,
        ))
    }

    /// Encode and write a tile, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Write`] if encoding fails or the destination is
    /// not writable.
    pub fn save(&self, tile: &IconTile<C::Raster>) -> Result<OutputArtifact> {
        let GridCell { row, col, rect } = tile.cell;
        let path = self.artifact_path(row, col);
        let write_err = |reason: String| SliceError::Write {
            path: path.clone(),
            reason,
        };

        let bytes = self
            .codec
            .encode(&tile.raster, self.output.format)
            .map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&path, bytes).map_err(|e| write_err(e.to_string()))?;

        tracing::debug!(row, col, path = %path.display(), "wrote tile");
        Ok(OutputArtifact {
            row,
            col,
            rect,
            path,
        })
    }

    /// Slice an already loaded sheet.
    ///
    /// # Errors
    ///
    /// Fails before writing anything if the grid does not fit; otherwise
    /// aborts on the first crop or write failure.
    pub fn slice_source(&self, source: &SourceImage<C::Raster>) -> Result<SliceReport> {
        self.check_fits(source)?;
        std::fs::create_dir_all(&self.output.dir).map_err(|e| SliceError::Write {
            path: self.output.dir.clone(),
            reason: e.to_string(),
        })?;

        let mut artifacts = Vec::with_capacity(self.grid.cell_count().unwrap_or_default());
        for cell in self.grid.cells() {
            let tile = self.crop_tile(source, cell)?;
            artifacts.push(self.save(&tile)?);
        }

        tracing::info!(
            tiles = artifacts.len(),
            dir = %self.output.dir.display(),
            "sliced sprite sheet"
        );
        Ok(self.report(source, artifacts))
    }

    /// Load `path` and write one file per grid cell.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load) and [`slice_source`](Self::slice_source).
    pub fn slice(&self, path: &Path) -> Result<SliceReport> {
        let source = self.load(path)?;
        self.slice_source(&source)
    }

    /// Load and validate `path`, returning the tiles a run would write.
    ///
    /// Nothing is cropped and the output directory is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Load`] or [`SliceError::Geometry`].
    pub fn plan(&self, path: &Path) -> Result<SliceReport> {
        let source = self.load(path)?;
        self.check_fits(&source)?;
        let artifacts = self
            .grid
            .cells()
            .map(|cell| OutputArtifact {
                row: cell.row,
                col: cell.col,
                rect: cell.rect,
                path: self.artifact_path(cell.row, cell.col),
            })
            .collect();
        Ok(self.report(&source, artifacts))
    }

    fn report(
        &self,
        source: &SourceImage<C::Raster>,
        artifacts: Vec<OutputArtifact>,
    ) -> SliceReport {
        SliceReport {
            source: source.path.clone(),
            grid: self.grid,
            format: self.output.format,
            artifacts,
        }
    }
}

/// Write `report` as pretty JSON, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the manifest cannot be serialized or written.
pub fn write_manifest(report: &SliceReport, path: &Path) -> Result<()> {
    let write_err = |reason: String| SliceError::Write {
        path: path.to_path_buf(),
        reason,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }
    let json = serde_json::to_string_pretty(report).map_err(|e| write_err(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| write_err(e.to_string()))?;
    tracing::info!(path = %path.display(), "wrote manifest");
    Ok(())
}
