use serde::{Deserialize, Serialize};

/// Pixel dimensions of the frames of one detection session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of samples in one frame, `None` if it does not fit `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        let w = usize::try_from(self.width).ok()?;
        let h = usize::try_from(self.height).ok()?;
        w.checked_mul(h)
    }

    /// Linear index `y * width + x`, `None` outside the frame.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One captured frame as handed over by the camera: a compressed image plus
/// the pixel geometry the camera was configured for.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(self.width, self.height)
    }
}

/// Borrowed row-major 8-bit grayscale image.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl GrayImageView<'_> {
    /// Sample at `(x, y)`, `None` outside the image.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major_and_bounded() {
        let g = FrameGeometry::new(8, 4);
        assert_eq!(g.index(0, 0), Some(0));
        assert_eq!(g.index(7, 0), Some(7));
        assert_eq!(g.index(0, 1), Some(8));
        assert_eq!(g.index(7, 3), Some(31));
        assert_eq!(g.index(8, 0), None);
        assert_eq!(g.index(0, 4), None);
    }

    #[test]
    fn pixel_count_handles_empty_geometry() {
        assert_eq!(FrameGeometry::new(240, 240).pixel_count(), Some(57_600));
        assert_eq!(FrameGeometry::new(0, 240).pixel_count(), Some(0));
        assert!(FrameGeometry::new(0, 240).is_empty());
    }
}
