use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// A settings field outside its documented range.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} = {value} is outside [{min}, {max}]")]
pub struct SettingsError {
    pub field: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

/// Tunable flash-detection parameters.
///
/// Persisted through `flash-shot-settings`; the in-memory layout is not the
/// storage layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Sensor exposure bias. Only the camera collaborator consumes it.
    pub auto_exposure_level: i8,
    /// A sample must be strictly brighter than this to be considered.
    pub brightness_threshold: u8,
    /// Largest accepted spot, in hit pixels (inclusive).
    pub max_spot_size: u16,
    /// Minimum rise over the previous frame for a bright sample to count.
    pub min_brightness_change: u8,
    /// Debounce window between accepted shots, in frames.
    pub min_frames_between_hits: u16,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            auto_exposure_level: -1,
            brightness_threshold: 245,
            max_spot_size: 20,
            min_brightness_change: 40,
            min_frames_between_hits: 5,
        }
    }
}

impl DetectionSettings {
    pub const AUTO_EXPOSURE_LEVEL: RangeInclusive<i8> = -2..=2;
    pub const BRIGHTNESS_THRESHOLD: RangeInclusive<u8> = 0..=255;
    pub const MAX_SPOT_SIZE: RangeInclusive<u16> = 1..=200;
    pub const MIN_BRIGHTNESS_CHANGE: RangeInclusive<u8> = 0..=100;
    pub const MIN_FRAMES_BETWEEN_HITS: RangeInclusive<u16> = 1..=100;

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check(
            "auto_exposure_level",
            self.auto_exposure_level,
            &Self::AUTO_EXPOSURE_LEVEL,
        )?;
        check("max_spot_size", self.max_spot_size, &Self::MAX_SPOT_SIZE)?;
        check(
            "min_brightness_change",
            self.min_brightness_change,
            &Self::MIN_BRIGHTNESS_CHANGE,
        )?;
        check(
            "min_frames_between_hits",
            self.min_frames_between_hits,
            &Self::MIN_FRAMES_BETWEEN_HITS,
        )?;
        Ok(())
    }

    /// Copy with every field forced into its range.
    pub fn clamped(self) -> Self {
        Self {
            auto_exposure_level: clamp(self.auto_exposure_level, &Self::AUTO_EXPOSURE_LEVEL),
            brightness_threshold: self.brightness_threshold,
            max_spot_size: clamp(self.max_spot_size, &Self::MAX_SPOT_SIZE),
            min_brightness_change: clamp(self.min_brightness_change, &Self::MIN_BRIGHTNESS_CHANGE),
            min_frames_between_hits: clamp(
                self.min_frames_between_hits,
                &Self::MIN_FRAMES_BETWEEN_HITS,
            ),
        }
    }
}

fn check<T>(field: &'static str, value: T, range: &RangeInclusive<T>) -> Result<(), SettingsError>
where
    T: PartialOrd + Copy + Into<i64>,
{
    if range.contains(&value) {
        return Ok(());
    }
    Err(SettingsError {
        field,
        value: value.into(),
        min: (*range.start()).into(),
        max: (*range.end()).into(),
    })
}

fn clamp<T: PartialOrd + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}
