use std::fmt;

use flash_shot_core::SpotStats;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// An accepted flash.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Centroid of the hit pixels, normalized to `[0, 1)` by the frame size.
    pub position: Point2<f32>,
    /// Number of hit pixels in the spot.
    pub pixels: u32,
}

/// Why a frame did not produce a shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    NoHitPixels,
    /// Too many hit pixels: ambient over-exposure rather than a flash.
    SpotTooLarge { pixels: u32, max: u32 },
    /// Still inside the debounce window of the previous shot.
    Debounce {
        frames_since_last_hit: u32,
        required: u32,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHitPixels => f.write_str("no hit pixels"),
            Self::SpotTooLarge { pixels, max } => {
                write!(f, "spot of {pixels} px exceeds {max} px")
            }
            Self::Debounce {
                frames_since_last_hit,
                required,
            } => write!(
                f,
                "{frames_since_last_hit} frames since last shot, {required} required"
            ),
        }
    }
}

/// Output of processing one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Zero-based index of the frame within the session.
    pub frame_index: u64,
    /// Hit-pixel statistics, also for rejected frames.
    pub spot: SpotStats,
    pub shot: Option<Shot>,
    /// Set exactly when `shot` is `None`.
    pub rejection: Option<Rejection>,
    /// The decoder gave up on this frame; `spot` is empty.
    pub decode_failed: bool,
}

impl DetectionResult {
    #[inline]
    pub fn hit(&self) -> bool {
        self.shot.is_some()
    }

    #[inline]
    pub fn position(&self) -> Option<Point2<f32>> {
        self.shot.map(|s| s.position)
    }
}
