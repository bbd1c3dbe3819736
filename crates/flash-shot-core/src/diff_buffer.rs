use crate::image::{FrameGeometry, GrayImageView};

/// Errors raised while sizing the difference buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("frame geometry {width}x{height} has no pixels")]
    EmptyGeometry { width: u32, height: u32 },
    #[error("cannot allocate difference buffers for a {width}x{height} frame")]
    Allocation { width: u32, height: u32 },
}

/// Previous and current grayscale snapshots of one detection session.
///
/// Both buffers always have `width * height` samples, indexed `y * width + x`.
#[derive(Clone, Debug)]
pub struct FrameDifferenceBuffer {
    geometry: FrameGeometry,
    previous: Vec<u8>,
    current: Vec<u8>,
    has_previous: bool,
}

impl FrameDifferenceBuffer {
    /// Allocate two zero-filled buffers for `geometry`.
    ///
    /// Allocation is fallible: an oversized geometry is reported as
    /// [`BufferError::Allocation`] instead of aborting the process.
    pub fn allocate(geometry: FrameGeometry) -> Result<Self, BufferError> {
        let FrameGeometry { width, height } = geometry;
        if geometry.is_empty() {
            return Err(BufferError::EmptyGeometry { width, height });
        }
        let len = geometry
            .pixel_count()
            .ok_or(BufferError::Allocation { width, height })?;

        let previous = zeroed(len).ok_or(BufferError::Allocation { width, height })?;
        let current = zeroed(len).ok_or(BufferError::Allocation { width, height })?;

        Ok(Self {
            geometry,
            previous,
            current,
            has_previous: false,
        })
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// `true` once at least one frame has been rotated into `previous`.
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Store a sample of the frame being decoded. Out-of-range writes are
    /// dropped and reported as `false`.
    #[inline]
    pub fn write(&mut self, index: usize, sample: u8) -> bool {
        match self.current.get_mut(index) {
            Some(slot) => {
                *slot = sample;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn current(&self, index: usize) -> Option<u8> {
        self.current.get(index).copied()
    }

    /// Sample of the last rotated frame, `None` before the first rotation.
    #[inline]
    pub fn previous(&self, index: usize) -> Option<u8> {
        if !self.has_previous {
            return None;
        }
        self.previous.get(index).copied()
    }

    /// End of frame: the current snapshot becomes the diff baseline.
    pub fn rotate(&mut self) {
        self.previous.copy_from_slice(&self.current);
        self.has_previous = true;
    }

    pub fn current_frame(&self) -> GrayImageView<'_> {
        self.view(&self.current)
    }

    pub fn previous_frame(&self) -> Option<GrayImageView<'_>> {
        self.has_previous.then(|| self.view(&self.previous))
    }

    fn view<'a>(&self, data: &'a [u8]) -> GrayImageView<'a> {
        GrayImageView {
            width: self.geometry.width as usize,
            height: self.geometry.height as usize,
            data,
        }
    }
}

fn zeroed(len: usize) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    buf.resize(len, 0);
    Some(buf)
}
