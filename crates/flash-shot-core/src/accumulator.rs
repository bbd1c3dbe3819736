use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::diff_buffer::FrameDifferenceBuffer;
use crate::image::FrameGeometry;
use crate::settings::DetectionSettings;
use crate::tile::{Tile, TileFlow, TileSink};

/// Hit-pixel statistics of one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotStats {
    pub count: u32,
    pub sum_x: u64,
    pub sum_y: u64,
}

impl SpotStats {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean hit-pixel coordinate normalized by the frame size.
    ///
    /// Lies in `[0, 1)` on both axes whenever every counted pixel was inside
    /// `geometry`.
    pub fn centroid(&self, geometry: FrameGeometry) -> Option<Point2<f32>> {
        if self.count == 0 || geometry.is_empty() {
            return None;
        }
        let n = f64::from(self.count);
        let x = self.sum_x as f64 / (n * f64::from(geometry.width));
        let y = self.sum_y as f64 / (n * f64::from(geometry.height));
        Some(Point2::new(x as f32, y as f32))
    }

    #[inline]
    fn add(&mut self, x: u32, y: u32) {
        self.count = self.count.saturating_add(1);
        self.sum_x += u64::from(x);
        self.sum_y += u64::from(y);
    }
}

/// Per-frame tile sink: records every sample into the current snapshot and
/// counts the samples that look like a fresh flash.
///
/// A sample counts when it is strictly brighter than the threshold and, once
/// a previous frame exists, rose by at least `min_brightness_change` over it.
/// On the first frame of a session every bright sample counts.
pub struct SpotAccumulator<'a> {
    frame: &'a mut FrameDifferenceBuffer,
    threshold: u8,
    min_change: i16,
    stats: SpotStats,
    dropped: usize,
}

impl<'a> SpotAccumulator<'a> {
    pub fn new(frame: &'a mut FrameDifferenceBuffer, settings: &DetectionSettings) -> Self {
        Self {
            frame,
            threshold: settings.brightness_threshold,
            min_change: i16::from(settings.min_brightness_change),
            stats: SpotStats::default(),
            dropped: 0,
        }
    }

    /// Statistics gathered so far.
    #[inline]
    pub fn stats(&self) -> SpotStats {
        self.stats
    }

    /// Samples that fell outside the frame geometry and were ignored.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn accumulate(&mut self, tile: &Tile<'_>) {
        let geometry = self.frame.geometry();
        for (x, y, sample) in tile.pixels() {
            let Some(idx) = geometry.index(x, y) else {
                self.dropped += 1;
                continue;
            };
            self.frame.write(idx, sample);

            if sample <= self.threshold {
                continue;
            }
            let fresh = match self.frame.previous(idx) {
                Some(prev) => i16::from(sample) - i16::from(prev) >= self.min_change,
                None => true,
            };
            if fresh {
                self.stats.add(x, y);
            }
        }
    }

    pub fn finish(self) -> SpotStats {
        self.stats
    }
}

impl TileSink for SpotAccumulator<'_> {
    fn on_tile(&mut self, tile: &Tile<'_>) -> TileFlow {
        self.accumulate(tile);
        TileFlow::Continue
    }
}
