//! Decoder seam: rectangular tiles of decoded brightness samples.

/// Sample slice length does not match the tile rectangle.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("tile {width}x{height} needs {expected} samples, got {got}")]
pub struct TileError {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub got: usize,
}

/// A block of decoded samples placed at `(x, y)` in frame coordinates.
///
/// `samples` is row-major with exactly `width * height` entries.
#[derive(Clone, Copy, Debug)]
pub struct Tile<'a> {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    samples: &'a [u8],
}

impl<'a> Tile<'a> {
    pub fn new(x: u32, y: u32, width: u32, height: u32, samples: &'a [u8]) -> Result<Self, TileError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(TileError {
                width,
                height,
                expected,
                got: samples.len(),
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            samples,
        })
    }

    #[inline]
    pub fn samples(&self) -> &'a [u8] {
        self.samples
    }

    /// Iterate `(abs_x, abs_y, sample)` in row-major order.
    ///
    /// Coordinates saturate at `u32::MAX` rather than wrap.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, u8)> + 'a {
        let (x0, y0, w) = (self.x, self.y, self.width.max(1) as usize);
        self.samples.iter().enumerate().map(move |(i, &s)| {
            let dx = (i % w) as u32;
            let dy = (i / w) as u32;
            (x0.saturating_add(dx), y0.saturating_add(dy), s)
        })
    }
}

/// What the decoder should do after a tile was consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileFlow {
    Continue,
    Stop,
}

/// Receives tiles inline, on the decoding thread, while a frame is decoded.
///
/// Implementations run once per tile within a single video-frame budget and
/// must not block or allocate.
pub trait TileSink {
    fn on_tile(&mut self, tile: &Tile<'_>) -> TileFlow;
}

impl<F> TileSink for F
where
    F: FnMut(&Tile<'_>) -> TileFlow,
{
    fn on_tile(&mut self, tile: &Tile<'_>) -> TileFlow {
        self(tile)
    }
}

/// Decodes one compressed frame, handing every decoded tile to `sink` in the
/// decoder's own raster order before returning.
///
/// A malformed frame may deliver some tiles and then fail.
pub trait TileDecoder {
    type Error: std::error::Error + Send + Sync + 'static;

    fn decode(&mut self, data: &[u8], sink: &mut dyn TileSink) -> Result<(), Self::Error>;
}

impl<D: TileDecoder + ?Sized> TileDecoder for &mut D {
    type Error = D::Error;

    fn decode(&mut self, data: &[u8], sink: &mut dyn TileSink) -> Result<(), Self::Error> {
        (**self).decode(data, sink)
    }
}

impl<D: TileDecoder + ?Sized> TileDecoder for Box<D> {
    type Error = D::Error;

    fn decode(&mut self, data: &[u8], sink: &mut dyn TileSink) -> Result<(), Self::Error> {
        (**self).decode(data, sink)
    }
}
