//! Decoder for uncompressed row-major 8-bit grayscale frames.

use flash_shot_core::{FrameGeometry, Tile, TileDecoder, TileError, TileFlow, TileSink};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RawDecodeError {
    #[error("raw frame truncated: {got} of {expected} bytes")]
    Truncated { expected: usize, got: usize },
    #[error("raw frame oversized: {got} bytes for {expected}-byte frame")]
    Oversized { expected: usize, got: usize },
    #[error("tile size must be positive")]
    InvalidTileSize,
    #[error(transparent)]
    Tile(#[from] TileError),
}

/// Cuts a raw grayscale buffer into square tiles, row by row of tiles, the
/// way a block-based decoder emits MCUs.
///
/// A truncated buffer delivers every tile it fully covers, then fails.
#[derive(Clone, Debug)]
pub struct RawGrayDecoder {
    geometry: FrameGeometry,
    tile_size: u32,
    scratch: Vec<u8>,
}

impl RawGrayDecoder {
    pub const DEFAULT_TILE_SIZE: u32 = 8;

    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            tile_size: Self::DEFAULT_TILE_SIZE,
            scratch: Vec::new(),
        }
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Reuse the decoder (and its scratch tile) for another frame size.
    pub fn set_geometry(&mut self, geometry: FrameGeometry) {
        self.geometry = geometry;
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

impl TileDecoder for RawGrayDecoder {
    type Error = RawDecodeError;

    fn decode(&mut self, data: &[u8], sink: &mut dyn TileSink) -> Result<(), RawDecodeError> {
        if self.tile_size == 0 {
            return Err(RawDecodeError::InvalidTileSize);
        }
        let FrameGeometry { width, height } = self.geometry;
        let expected = self.geometry.pixel_count().unwrap_or(usize::MAX);
        if data.len() > expected {
            return Err(RawDecodeError::Oversized {
                expected,
                got: data.len(),
            });
        }

        let ts = self.tile_size;
        self.scratch.clear();
        self.scratch.reserve((ts as usize).pow(2));
        let stride = width as usize;

        let mut ty = 0;
        while ty < height {
            let th = ts.min(height - ty);
            // the whole band of tile rows has to be present
            let band_end = (ty + th) as usize * stride;
            if band_end > data.len() {
                return Err(RawDecodeError::Truncated {
                    expected,
                    got: data.len(),
                });
            }

            let mut tx = 0;
            while tx < width {
                let tw = ts.min(width - tx);
                self.scratch.clear();
                for row in ty..ty + th {
                    let start = row as usize * stride + tx as usize;
                    self.scratch
                        .extend_from_slice(&data[start..start + tw as usize]);
                }
                let tile = Tile::new(tx, ty, tw, th, &self.scratch)?;
                if sink.on_tile(&tile) == TileFlow::Stop {
                    return Ok(());
                }
                tx += tw;
            }
            ty += th;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Placed = (u32, u32, u32, u32);

    fn collect(
        decoder: &mut RawGrayDecoder,
        data: &[u8],
    ) -> (Vec<Placed>, Result<(), RawDecodeError>) {
        let mut tiles = Vec::new();
        let mut sink = |t: &Tile<'_>| {
            tiles.push((t.x, t.y, t.width, t.height));
            TileFlow::Continue
        };
        let res = decoder.decode(data, &mut sink);
        (tiles, res)
    }

    #[test]
    fn covers_the_frame_with_edge_tiles_clipped() {
        let g = FrameGeometry::new(5, 3);
        let data: Vec<u8> = (0..15).collect();
        let mut dec = RawGrayDecoder::new(g).with_tile_size(4);
        let (tiles, res) = collect(&mut dec, &data);
        assert_eq!(res, Ok(()));
        assert_eq!(tiles, vec![(0, 0, 4, 3), (4, 0, 1, 3)]);
    }

    #[test]
    fn tile_samples_are_taken_from_the_right_rows() {
        let g = FrameGeometry::new(4, 4);
        let data: Vec<u8> = (0..16).collect();
        let mut dec = RawGrayDecoder::new(g).with_tile_size(2);
        let mut last = Vec::new();
        let mut sink = |t: &Tile<'_>| {
            if (t.x, t.y) == (2, 2) {
                last = t.samples().to_vec();
            }
            TileFlow::Continue
        };
        dec.decode(&data, &mut sink).unwrap();
        assert_eq!(last, vec![10, 11, 14, 15]);
    }

    #[test]
    fn truncated_frame_delivers_complete_bands_then_fails() {
        let g = FrameGeometry::new(4, 4);
        let mut dec = RawGrayDecoder::new(g).with_tile_size(2);
        let (tiles, res) = collect(&mut dec, &[0u8; 11]);
        assert_eq!(tiles, vec![(0, 0, 2, 2), (2, 0, 2, 2)]);
        assert_eq!(
            res,
            Err(RawDecodeError::Truncated {
                expected: 16,
                got: 11
            })
        );
    }

    #[test]
    fn stop_ends_decoding_early() {
        let g = FrameGeometry::new(4, 4);
        let mut dec = RawGrayDecoder::new(g).with_tile_size(2);
        let mut seen = 0;
        let mut sink = |_: &Tile<'_>| {
            seen += 1;
            TileFlow::Stop
        };
        assert_eq!(dec.decode(&[0u8; 16], &mut sink), Ok(()));
        assert_eq!(seen, 1);
    }

    #[test]
    fn oversized_and_zero_tile_size_are_errors() {
        let g = FrameGeometry::new(2, 2);
        let (_, res) = collect(&mut RawGrayDecoder::new(g), &[0u8; 5]);
        assert!(matches!(res, Err(RawDecodeError::Oversized { .. })));
        let (_, res) = collect(&mut RawGrayDecoder::new(g).with_tile_size(0), &[0u8; 4]);
        assert_eq!(res, Err(RawDecodeError::InvalidTileSize));
    }
}
