use crate::core::{DetectionSettings, Frame, FrameGeometry};
use crate::decode::ImageTileDecoder;
use crate::detector::{ShotDetectError, ShotDetector};
use crate::io::{FrameReport, ShotReport};
use image::ImageReader;
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("failed to read frame {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no frame header could be read, session geometry unknown")]
    NoReadableFrame,

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Detect(#[from] ShotDetectError),
}

/// Width and height from an encoded frame's header, without decoding pixels.
pub fn frame_dimensions(bytes: &[u8]) -> Result<FrameGeometry, DetectError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .into_dimensions()?;
    Ok(FrameGeometry::new(width, height))
}

fn header_geometry(path: &Path) -> Option<FrameGeometry> {
    let reader = ImageReader::open(path).ok()?.with_guessed_format().ok()?;
    reader
        .into_dimensions()
        .ok()
        .map(|(w, h)| FrameGeometry::new(w, h))
}

/// Run one detection session over image files in capture order.
///
/// The session geometry is taken from the first frame with a readable
/// header. Frames that fail to decode are kept in the report with
/// `decode_failed` set; a file that cannot be read at all aborts the run.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(paths, settings), fields(frames = paths.len()))
)]
pub fn detect_shots_in_files<P: AsRef<Path>>(
    paths: &[P],
    settings: DetectionSettings,
) -> Result<ShotReport, DetectError> {
    let geometry = paths
        .iter()
        .find_map(|p| header_geometry(p.as_ref()))
        .ok_or(DetectError::NoReadableFrame)?;
    log::debug!(
        "session geometry {}x{} over {} frames",
        geometry.width,
        geometry.height,
        paths.len()
    );

    let mut detector = ShotDetector::new(settings, ImageTileDecoder::guess())?;
    let mut report = ShotReport::new(settings, geometry);
    for path in paths {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| DetectError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let result = detector.process(&Frame::new(&bytes, geometry.width, geometry.height))?;
        report.frames.push(FrameReport {
            path: path.to_path_buf(),
            result,
        });
    }
    Ok(report)
}
