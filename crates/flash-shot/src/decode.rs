//! Compressed-frame decoding through the `image` crate.

use crate::core::{FrameGeometry, TileDecoder, TileSink};
use crate::detector::{RawDecodeError, RawGrayDecoder};
use image::ImageFormat;

#[derive(thiserror::Error, Debug)]
pub enum ImageDecodeError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Tiling(#[from] RawDecodeError),
}

/// Decodes a JPEG (or any format `image` knows) to 8-bit luma and hands it to
/// the sink tile by tile, 8x8 by default like baseline JPEG MCUs.
///
/// Tiles are clipped to the decoded image. The scratch tile is reused across
/// frames.
#[derive(Clone, Debug)]
pub struct ImageTileDecoder {
    format: Option<ImageFormat>,
    tiler: RawGrayDecoder,
}

impl ImageTileDecoder {
    /// Decoder for camera JPEG captures.
    pub fn jpeg() -> Self {
        Self::with_format(Some(ImageFormat::Jpeg))
    }

    /// Decoder that sniffs the format from the data.
    pub fn guess() -> Self {
        Self::with_format(None)
    }

    fn with_format(format: Option<ImageFormat>) -> Self {
        Self {
            format,
            tiler: RawGrayDecoder::new(FrameGeometry::new(0, 0)),
        }
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tiler = self.tiler.with_tile_size(tile_size);
        self
    }

    #[inline]
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }
}

impl Default for ImageTileDecoder {
    fn default() -> Self {
        Self::jpeg()
    }
}

impl TileDecoder for ImageTileDecoder {
    type Error = ImageDecodeError;

    fn decode(&mut self, data: &[u8], sink: &mut dyn TileSink) -> Result<(), ImageDecodeError> {
        let decoded = match self.format {
            Some(format) => image::load_from_memory_with_format(data, format)?,
            None => image::load_from_memory(data)?,
        };
        let luma = decoded.into_luma8();
        self.tiler
            .set_geometry(FrameGeometry::new(luma.width(), luma.height()));
        self.tiler.decode(luma.as_raw(), sink)?;
        Ok(())
    }
}
