use flash_shot_core::{DetectionSettings, SettingsError};

use crate::codec::{decode_settings, encode_settings, CodecError};
use crate::record::{RecordStore, RecordStoreError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Namespace the firmware kept its detection preferences under.
pub const DEFAULT_NAMESPACE: &str = "detection";
pub const DEFAULT_KEY: &str = "settings";

/// Why a persisted record was not used.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("no settings record stored")]
    Missing,
    #[error(transparent)]
    Store(#[from] RecordStoreError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Settings could not be persisted.
#[derive(thiserror::Error, Debug)]
pub enum SettingsStoreError {
    #[error("refusing to persist invalid settings: {0}")]
    Invalid(#[from] SettingsError),
    #[error("failed to persist settings: {0}")]
    Store(#[from] RecordStoreError),
}

/// Loads and saves [`DetectionSettings`] through a [`RecordStore`].
#[derive(Debug)]
pub struct SettingsStore<S> {
    store: S,
    key: String,
}

impl<S: RecordStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn backend(&self) -> &S {
        &self.store
    }

    pub fn into_backend(self) -> S {
        self.store
    }

    /// Stored settings, or the defaults when the record is unusable.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), fields(key = %self.key)))]
    pub fn load(&self) -> DetectionSettings {
        match self.try_load() {
            Ok(settings) => {
                log::info!("settings loaded from record {:?}", self.key);
                settings
            }
            Err(LoadError::Missing) => {
                log::info!("no stored settings, using defaults");
                DetectionSettings::default()
            }
            Err(err) => {
                log::warn!("ignoring stored settings ({err}), using defaults");
                DetectionSettings::default()
            }
        }
    }

    /// Like [`load`](Self::load) but reports why the record was rejected.
    pub fn try_load(&self) -> Result<DetectionSettings, LoadError> {
        let bytes = self.store.get_record(&self.key)?.ok_or(LoadError::Missing)?;
        Ok(decode_settings(&bytes)?)
    }

    /// Validate and persist. On failure the caller's in-memory value stays
    /// authoritative.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, settings), fields(key = %self.key)))]
    pub fn save(&mut self, settings: &DetectionSettings) -> Result<(), SettingsStoreError> {
        settings.validate()?;
        self.store.put_record(&self.key, &encode_settings(settings))?;
        log::info!("settings saved to record {:?}", self.key);
        Ok(())
    }

    /// Persist and return the defaults.
    pub fn reset(&mut self) -> Result<DetectionSettings, SettingsStoreError> {
        let defaults = DetectionSettings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }
}
