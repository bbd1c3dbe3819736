//! Persistence for [`DetectionSettings`].
//!
//! Settings are stored as one fixed-size, versioned binary record under a
//! string key. The storage backend is abstracted by [`RecordStore`]; an
//! in-memory and a directory-backed implementation are provided.
//!
//! Loading never fails: an absent, wrongly sized, unknown-version or
//! out-of-range record yields [`DetectionSettings::default`].

mod codec;
mod record;
mod store;

pub use codec::{decode_settings, encode_settings, CodecError, RECORD_LEN, RECORD_VERSION};
pub use record::{FileRecordStore, MemoryRecordStore, RecordStore, RecordStoreError};
pub use store::{LoadError, SettingsStore, SettingsStoreError, DEFAULT_KEY, DEFAULT_NAMESPACE};

pub use flash_shot_core::DetectionSettings;
