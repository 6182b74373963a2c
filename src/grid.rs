//! Grid geometry: cell rectangles, row-major traversal and the fit check.
//!
//! All coordinates are pixels with the origin at the top-left corner of the
//! sheet. Rectangles are half-open: `right` and `lower` are one past the last
//! pixel covered.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SliceError};

/// Axis-aligned pixel rectangle `(left, upper, right, lower)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: u32,
    pub upper: u32,
    pub right: u32,
    pub lower: u32,
}

impl Rect {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.lower - self.upper
    }

    /// Returns `true` if the rectangle lies within a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.lower <= height
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.upper < other.lower
            && other.upper < self.lower
    }
}

/// Bounding box of the cell at (`row`, `col`) for the given cell size.
///
/// Callers are expected to have validated the grid with
/// [`GridSpec::validate`], which rules out overflow.
pub fn bounding_box(row: u32, col: u32, cell_width: u32, cell_height: u32) -> Rect {
    let left = col * cell_width;
    let upper = row * cell_height;
    Rect {
        left,
        upper,
        right: left + cell_width,
        lower: upper + cell_height,
    }
}

/// One grid cell: its coordinate and pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    pub rect: Rect,
}

/// Fixed grid layout of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Width of one cell in pixels.
    pub cell_width: u32,
    /// Height of one cell in pixels.
    pub cell_height: u32,
    /// Number of cells per row.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cell_width: 32,
            cell_height: 32,
            columns: 6,
            rows: 2,
        }
    }
}

impl GridSpec {
    pub fn new(cell_width: u32, cell_height: u32, columns: u32, rows: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            columns,
            rows,
        }
    }

    /// Reject zero-sized grids and grids whose extent overflows `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.checked_extent().map(|_| ())
    }

    /// Validated pixel extent of the grid.
    fn checked_extent(&self) -> Result<(u32, u32)> {
        for (name, value) in [
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
            ("columns", self.columns),
            ("rows", self.rows),
        ] {
            if value == 0 {
                return Err(SliceError::Config(format!("{name} must be greater than 0")));
            }
        }
        match (self.required_size(), self.cell_count()) {
            (Some(extent), Some(_)) => Ok(extent),
            _ => Err(SliceError::Config(format!(
                "grid of {}x{} cells at {}x{} px is too large",
                self.columns, self.rows, self.cell_width, self.cell_height
            ))),
        }
    }

    /// Pixel extent covered by the grid, or `None` on overflow.
    pub fn required_size(&self) -> Option<(u32, u32)> {
        let width = self.columns.checked_mul(self.cell_width)?;
        let height = self.rows.checked_mul(self.cell_height)?;
        Some((width, height))
    }

    /// Number of cells in the grid, or `None` if it overflows `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        let columns = usize::try_from(self.columns).ok()?;
        let rows = usize::try_from(self.rows).ok()?;
        columns.checked_mul(rows)
    }

    pub fn bounding_box(&self, row: u32, col: u32) -> Rect {
        bounding_box(row, col, self.cell_width, self.cell_height)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |col| GridCell {
                row,
                col,
                rect: self.bounding_box(row, col),
            })
        })
    }

    /// Fail unless a `width x height` sheet contains every cell.
    ///
    /// Returns the pixel extent of the grid.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Config`] for an invalid grid and
    /// [`SliceError::Geometry`] when the sheet is too small in either axis.
    pub fn check_fits(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        let (required_width, required_height) = self.checked_extent()?;
        if width < required_width || height < required_height {
            return Err(SliceError::Geometry {
                actual_width: width,
                actual_height: height,
                required_width,
                required_height,
            });
        }
        Ok((required_width, required_height))
    }
}
