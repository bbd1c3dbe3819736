//! Core types and per-frame state for camera flash ("shot") detection.
//!
//! This crate is intentionally small. It does *not* decode images itself:
//! decoders plug in through [`TileDecoder`] and deliver decoded brightness
//! tiles to a [`TileSink`]. The one sink that matters here is
//! [`SpotAccumulator`], which diffs every sample against the previous frame
//! stored in a [`FrameDifferenceBuffer`] and collects hit-pixel statistics.

mod accumulator;
mod diff_buffer;
mod image;
mod logger;
mod settings;
mod tile;

pub use accumulator::{SpotAccumulator, SpotStats};
pub use diff_buffer::{BufferError, FrameDifferenceBuffer};
pub use image::{Frame, FrameGeometry, GrayImageView};
pub use settings::{DetectionSettings, SettingsError};
pub use tile::{Tile, TileDecoder, TileError, TileFlow, TileSink};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{default_directives, init_with_level, level_from_verbosity};
