//! Flash ("shot") detection over a stream of compressed grayscale frames.
//!
//! One [`ShotDetector`] owns one detection session:
//! - decode each frame through a pluggable [`TileDecoder`], feeding every
//!   tile into a [`SpotAccumulator`](flash_shot_core::SpotAccumulator),
//! - accept a shot when the hit-pixel count is in `[1, max_spot_size]` and
//!   the debounce window has elapsed,
//! - report the normalized centroid of the hit pixels,
//! - keep the frame as the differencing baseline for the next one.
//!
//! [`RawGrayDecoder`] tiles uncompressed buffers; JPEG decoding lives in the
//! `flash-shot` facade crate.

mod detector;
mod raw;

pub use detector::{
    DetectionResult, DetectorPhase, Rejection, Shot, ShotDetectError, ShotDetector,
};
pub use raw::{RawDecodeError, RawGrayDecoder};

pub use flash_shot_core::{
    DetectionSettings, Frame, FrameGeometry, SpotStats, Tile, TileDecoder, TileFlow, TileSink,
};
