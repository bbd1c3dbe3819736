use super::result::{Rejection, Shot};
use super::{DetectionResult, ShotDetectError};
use flash_shot_core::{
    DetectionSettings, Frame, FrameDifferenceBuffer, FrameGeometry, SpotAccumulator, SpotStats,
    TileDecoder,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Counter value before the first accepted shot: every `min_frames_between_hits`
/// is already satisfied.
const DEBOUNCE_IDLE: u32 = u32::MAX;

/// Lifecycle of a detection session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorPhase {
    /// No difference buffers yet; the next frame allocates them.
    Uninitialized,
    /// Buffers allocated, debounce counter running.
    Ready,
}

/// Single-session flash detector.
///
/// Not reentrant: frames are processed one at a time by one caller loop.
pub struct ShotDetector<D> {
    settings: DetectionSettings,
    decoder: D,
    buffers: Option<FrameDifferenceBuffer>,
    frames_since_last_hit: u32,
    frames_processed: u64,
}

impl<D: TileDecoder> ShotDetector<D> {
    /// Create a detector. The difference buffers are allocated lazily by the
    /// first processed frame.
    pub fn new(settings: DetectionSettings, decoder: D) -> Result<Self, ShotDetectError> {
        settings.validate()?;
        Ok(Self {
            settings,
            decoder,
            buffers: None,
            frames_since_last_hit: DEBOUNCE_IDLE,
            frames_processed: 0,
        })
    }

    #[inline]
    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Replace the settings; takes effect with the next frame.
    pub fn set_settings(&mut self, settings: DetectionSettings) -> Result<(), ShotDetectError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    #[inline]
    pub fn phase(&self) -> DetectorPhase {
        match self.buffers {
            Some(_) => DetectorPhase::Ready,
            None => DetectorPhase::Uninitialized,
        }
    }

    /// Frames processed since the last accepted shot (`u32::MAX` before the
    /// first one).
    #[inline]
    pub fn frames_since_last_hit(&self) -> u32 {
        self.frames_since_last_hit
    }

    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    #[inline]
    pub fn difference_buffer(&self) -> Option<&FrameDifferenceBuffer> {
        self.buffers.as_ref()
    }

    #[inline]
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    #[inline]
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Drop the frame history and the debounce state.
    pub fn reset(&mut self) {
        self.buffers = None;
        self.frames_since_last_hit = DEBOUNCE_IDLE;
        self.frames_processed = 0;
    }

    /// Run one detection cycle on a captured frame.
    ///
    /// Fails only when the difference buffers cannot be allocated; the
    /// detector then stays uninitialized and retries on the next frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, frame),
            fields(width = frame.width, height = frame.height, bytes = frame.data.len())
        )
    )]
    pub fn process(&mut self, frame: &Frame<'_>) -> Result<DetectionResult, ShotDetectError> {
        let geometry = frame.geometry();
        let buffers = ensure_buffers(&mut self.buffers, geometry)?;

        let mut accumulator = SpotAccumulator::new(buffers, &self.settings);
        let decoded = self.decoder.decode(frame.data, &mut accumulator);
        let dropped = accumulator.dropped();
        let mut spot = accumulator.finish();

        let decode_failed = match decoded {
            Ok(()) => false,
            Err(err) => {
                log::warn!(
                    "frame {}: decode failed ({err}), treating as empty",
                    self.frames_processed
                );
                spot = SpotStats::default();
                true
            }
        };
        if dropped > 0 {
            log::debug!(
                "frame {}: {dropped} samples outside {}x{} ignored",
                self.frames_processed,
                geometry.width,
                geometry.height
            );
        }

        self.frames_since_last_hit = self.frames_since_last_hit.saturating_add(1);

        let verdict = evaluate(&self.settings, self.frames_since_last_hit, &spot, geometry);
        let frame_index = self.frames_processed;
        let (shot, rejection) = match verdict {
            Ok(shot) => {
                log::info!(
                    "frame {frame_index}: shot at ({:.3}, {:.3}), {} px",
                    shot.position.x,
                    shot.position.y,
                    shot.pixels
                );
                self.frames_since_last_hit = 0;
                (Some(shot), None)
            }
            Err(rejection) => {
                if !spot.is_empty() {
                    log::debug!("frame {frame_index}: rejected, {rejection}");
                }
                (None, Some(rejection))
            }
        };

        buffers.rotate();
        self.frames_processed += 1;

        Ok(DetectionResult {
            frame_index,
            spot,
            shot,
            rejection,
            decode_failed,
        })
    }
}

fn ensure_buffers(
    slot: &mut Option<FrameDifferenceBuffer>,
    geometry: FrameGeometry,
) -> Result<&mut FrameDifferenceBuffer, ShotDetectError> {
    let buffers = match slot.take() {
        Some(existing) if existing.geometry() == geometry => existing,
        Some(existing) => {
            let old = existing.geometry();
            log::warn!(
                "frame geometry changed from {}x{} to {}x{}, dropping frame history",
                old.width,
                old.height,
                geometry.width,
                geometry.height
            );
            allocate(geometry)?
        }
        None => allocate(geometry)?,
    };
    Ok(slot.insert(buffers))
}

fn allocate(geometry: FrameGeometry) -> Result<FrameDifferenceBuffer, ShotDetectError> {
    let buffers = FrameDifferenceBuffer::allocate(geometry).inspect_err(|err| {
        log::error!("{err}");
    })?;
    log::debug!(
        "allocated difference buffers for {}x{}",
        geometry.width,
        geometry.height
    );
    Ok(buffers)
}

/// Acceptance test. `frames_since_last_hit` already includes this frame.
fn evaluate(
    settings: &DetectionSettings,
    frames_since_last_hit: u32,
    spot: &SpotStats,
    geometry: FrameGeometry,
) -> Result<Shot, Rejection> {
    if spot.count == 0 {
        return Err(Rejection::NoHitPixels);
    }
    let max = u32::from(settings.max_spot_size);
    if spot.count > max {
        return Err(Rejection::SpotTooLarge {
            pixels: spot.count,
            max,
        });
    }
    let required = u32::from(settings.min_frames_between_hits);
    if frames_since_last_hit < required {
        return Err(Rejection::Debounce {
            frames_since_last_hit,
            required,
        });
    }
    let position = spot
        .centroid(geometry)
        .ok_or(Rejection::NoHitPixels)?;
    Ok(Shot {
        position,
        pixels: spot.count,
    })
}
