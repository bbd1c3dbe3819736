//! High-level facade crate for the `flash-shot-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the detector, settings and core crates
//! - (feature `image`) [`decode::ImageTileDecoder`], which decodes JPEG/PNG
//!   captures into MCU-sized brightness tiles, plus end-to-end helpers in
//!   [`detect`]
//! - JSON run configuration and reports in [`io`]
//! - (feature `cli`) the `flash-shot` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use flash_shot::decode::ImageTileDecoder;
//! use flash_shot::detector::{DetectionSettings, Frame, ShotDetector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut detector = ShotDetector::new(DetectionSettings::default(), ImageTileDecoder::jpeg())?;
//! for path in ["f0.jpg", "f1.jpg", "f2.jpg"] {
//!     let bytes = std::fs::read(path)?;
//!     let result = detector.process(&Frame::new(&bytes, 240, 240))?;
//!     if let Some(pos) = result.position() {
//!         println!("shot at {:.3} {:.3}", pos.x, pos.y);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `flash_shot::core`: settings, geometry, tiles, difference buffers, the accumulator.
//! - `flash_shot::detector`: the `ShotDetector` state machine and raw-buffer decoder.
//! - `flash_shot::settings`: persisted settings records.
//! - `flash_shot::decode` (feature `image`): compressed-frame decoding.
//! - `flash_shot::detect` (feature `image`): end-to-end helpers over image files.

pub use flash_shot_core as core;
pub use flash_shot_detector as detector;
pub use flash_shot_settings as settings;

pub use flash_shot_core::DetectionSettings;
pub use flash_shot_detector::{DetectionResult, Shot, ShotDetector};

#[cfg(feature = "image")]
pub mod decode;
#[cfg(feature = "image")]
pub mod detect;
pub mod io;
