//! Raster codec capability used by the slicer.
//!
//! [`RasterCodec`] is the seam between slicing logic and the imaging library:
//! the slicer only ever decodes, measures, crops and encodes. [`ImageCodec`]
//! implements it on top of the `image` crate.

use std::io::Cursor;
use std::str::FromStr;

use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SliceError};
use crate::grid::Rect;

/// Encoding used for written tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(format!("unsupported output format `{other}` (use png|jpeg)")),
        }
    }
}

/// Minimal decode/crop/encode capability.
pub trait RasterCodec: Send + Sync {
    /// In-memory raster produced by [`decode`](Self::decode).
    type Raster;

    /// Decode an encoded image.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Raster>;

    /// Pixel `(width, height)` of a raster.
    fn dimensions(&self, raster: &Self::Raster) -> (u32, u32);

    /// Copy the pixels inside `rect` into a new raster.
    ///
    /// Implementations must reject rectangles that leave the raster.
    fn crop(&self, raster: &Self::Raster, rect: Rect) -> Result<Self::Raster>;

    /// Encode a raster in the given format.
    fn encode(&self, raster: &Self::Raster, format: OutputFormat) -> Result<Vec<u8>>;
}

/// [`RasterCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl RasterCodec for ImageCodec {
    type Raster = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| SliceError::Codec(e.to_string()))
    }

    fn dimensions(&self, raster: &DynamicImage) -> (u32, u32) {
        raster.dimensions()
    }

    fn crop(&self, raster: &DynamicImage, rect: Rect) -> Result<DynamicImage> {
        let (width, height) = raster.dimensions();
        if !rect.fits_within(width, height) {
            return Err(SliceError::Geometry {
                actual_width: width,
                actual_height: height,
                required_width: rect.right,
                required_height: rect.lower,
            });
        }
        Ok(raster.crop_imm(rect.left, rect.upper, rect.width(), rect.height()))
    }

    fn encode(&self, raster: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        let written = match format {
            OutputFormat::Png => raster.write_to(&mut buf, ImageFormat::Png),
            // The JPEG encoder has no alpha channel.
            OutputFormat::Jpeg => {
                DynamicImage::ImageRgb8(raster.to_rgb8()).write_to(&mut buf, ImageFormat::Jpeg)
            }
        };
        written.map_err(|e| SliceError::Codec(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::grid::bounding_box;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, (x ^ y) as u8, 255])
        }))
    }

    #[test]
    fn output_format_parses_aliases() {
        assert_eq!("png".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("PNG".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("jpeg".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!(" jpg ".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_extensions() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = ImageCodec.decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, SliceError::Codec(_)));
    }

    #[test]
    fn crop_copies_exact_pixels() {
        let sheet = gradient(64, 32);
        let rect = bounding_box(0, 1, 32, 32);
        let tile = ImageCodec.crop(&sheet, rect).unwrap();

        assert_eq!(ImageCodec.dimensions(&tile), (32, 32));
        let tile = tile.to_rgba8();
        let sheet = sheet.to_rgba8();
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(tile.get_pixel(x, y), sheet.get_pixel(x + 32, y));
            }
        }
    }

    #[test]
    fn crop_outside_bounds_is_geometry_error() {
        let sheet = gradient(48, 32);
        let err = ImageCodec
            .crop(&sheet, bounding_box(0, 1, 32, 32))
            .unwrap_err();
        match err {
            SliceError::Geometry {
                actual_width,
                required_width,
                ..
            } => {
                assert_eq!(actual_width, 48);
                assert_eq!(required_width, 64);
            }
            other => panic!("expected geometry error, got {other:?}"),
        }
    }

    #[test]
    fn png_encode_decodes_back_losslessly() {
        let sheet = gradient(16, 16);
        let bytes = ImageCodec.encode(&sheet, OutputFormat::Png).unwrap();
        let decoded = ImageCodec.decode(&bytes).unwrap();
        assert_eq!(decoded.to_rgba8(), sheet.to_rgba8());
    }

    #[test]
    fn jpeg_encode_accepts_rgba_input() {
        let sheet = gradient(16, 16);
        let bytes = ImageCodec.encode(&sheet, OutputFormat::Jpeg).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageCodec.dimensions(&ImageCodec.decode(&bytes).unwrap()), (16, 16));
    }
}
