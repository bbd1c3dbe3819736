//! Shot detection pipeline.
//!
//! This module wires the decoder, the spot accumulator and the difference
//! buffers together and applies the acceptance and debounce rules.

mod error;
mod pipeline;
mod result;

pub use error::ShotDetectError;
pub use pipeline::{DetectorPhase, ShotDetector};
pub use result::{DetectionResult, Rejection, Shot};
