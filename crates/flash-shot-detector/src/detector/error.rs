use flash_shot_core::{BufferError, SettingsError};

/// Errors returned by the shot detector.
///
/// Decode failures are not errors: a frame that fails to decode is processed
/// as a frame without hit pixels.
#[derive(thiserror::Error, Debug)]
pub enum ShotDetectError {
    #[error("difference buffers unavailable: {0}")]
    Allocation(#[from] BufferError),
    #[error("invalid detection settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}
