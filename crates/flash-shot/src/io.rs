//! JSON run configuration and report helpers.

use crate::core::{DetectionSettings, FrameGeometry};
use crate::detector::DetectionResult;
use crate::settings::{FileRecordStore, RecordStoreError, SettingsStore, DEFAULT_NAMESPACE};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] RecordStoreError),
    #[error("settings overrides must be a JSON object, got {0}")]
    OverridesNotObject(serde_json::Value),
    #[error("unknown setting {0:?}")]
    UnknownSetting(String),
}

/// Configuration for a detection run over a sequence of frame files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShotDetectConfig {
    /// Frames in capture order.
    pub frames: Vec<PathBuf>,
    /// Partial overrides applied on top of the stored (or default) settings.
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
    /// Directory holding the persisted settings namespace.
    #[serde(default)]
    pub settings_store: Option<PathBuf>,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl ShotDetectConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Settings for the run: the stored record when a store is configured,
    /// the defaults otherwise, then the JSON overrides field by field.
    ///
    /// Overrides are not range checked here; the detector validates them.
    pub fn resolve_settings(&self) -> Result<DetectionSettings, IoError> {
        let base = match &self.settings_store {
            Some(dir) => {
                SettingsStore::new(FileRecordStore::new(dir, DEFAULT_NAMESPACE)?).load()
            }
            None => DetectionSettings::default(),
        };
        match &self.settings {
            Some(overrides) => apply_overrides(base, overrides),
            None => Ok(base),
        }
    }
}

/// Merge a partial JSON object over `base`.
///
/// Every key must name a [`DetectionSettings`] field.
pub fn apply_overrides(
    base: DetectionSettings,
    overrides: &serde_json::Value,
) -> Result<DetectionSettings, IoError> {
    let src = overrides
        .as_object()
        .ok_or_else(|| IoError::OverridesNotObject(overrides.clone()))?;
    let mut fields = match serde_json::to_value(base)? {
        serde_json::Value::Object(fields) => fields,
        _ => serde_json::Map::new(),
    };
    for (key, value) in src {
        if !fields.contains_key(key) {
            return Err(IoError::UnknownSetting(key.clone()));
        }
        fields.insert(key.clone(), value.clone());
    }
    Ok(serde_json::from_value(serde_json::Value::Object(fields))?)
}

/// Per-frame entry of a [`ShotReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub result: DetectionResult,
}

/// Output of a detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotReport {
    pub settings: DetectionSettings,
    /// Session geometry: the size of the first frame whose header was readable.
    pub geometry: FrameGeometry,
    pub frames: Vec<FrameReport>,
}

impl ShotReport {
    pub fn new(settings: DetectionSettings, geometry: FrameGeometry) -> Self {
        Self {
            settings,
            geometry,
            frames: Vec::new(),
        }
    }

    /// Frames that produced an accepted shot.
    pub fn shots(&self) -> impl Iterator<Item = &FrameReport> + '_ {
        self.frames.iter().filter(|f| f.result.hit())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
