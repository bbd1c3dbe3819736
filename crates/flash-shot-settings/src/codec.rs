//! Binary layout of the persisted settings record.
//!
//! Version 1, 8 bytes, little-endian:
//!
//! | offset | width | field |
//! |---|---|---|
//! | 0 | u8  | version (= 1) |
//! | 1 | i8  | auto_exposure_level |
//! | 2 | u8  | brightness_threshold |
//! | 3 | u8  | min_brightness_change |
//! | 4 | u16 | max_spot_size |
//! | 6 | u16 | min_frames_between_hits |

use byteorder::{ByteOrder, LittleEndian};
use flash_shot_core::{DetectionSettings, SettingsError};

pub const RECORD_VERSION: u8 = 1;
pub const RECORD_LEN: usize = 8;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("settings record has {got} bytes, expected {expected}")]
    WrongLength { expected: usize, got: usize },
    #[error("unsupported settings record version {0}")]
    UnsupportedVersion(u8),
    #[error(transparent)]
    Invalid(#[from] SettingsError),
}

pub fn encode_settings(settings: &DetectionSettings) -> [u8; RECORD_LEN] {
    let mut out = [0u8; RECORD_LEN];
    out[0] = RECORD_VERSION;
    out[1] = settings.auto_exposure_level as u8;
    out[2] = settings.brightness_threshold;
    out[3] = settings.min_brightness_change;
    LittleEndian::write_u16(&mut out[4..6], settings.max_spot_size);
    LittleEndian::write_u16(&mut out[6..8], settings.min_frames_between_hits);
    out
}

/// Decode and validate a record.
pub fn decode_settings(bytes: &[u8]) -> Result<DetectionSettings, CodecError> {
    let raw: &[u8; RECORD_LEN] = bytes.try_into().map_err(|_| CodecError::WrongLength {
        expected: RECORD_LEN,
        got: bytes.len(),
    })?;
    if raw[0] != RECORD_VERSION {
        return Err(CodecError::UnsupportedVersion(raw[0]));
    }

    let settings = DetectionSettings {
        auto_exposure_level: raw[1] as i8,
        brightness_threshold: raw[2],
        min_brightness_change: raw[3],
        max_spot_size: LittleEndian::read_u16(&raw[4..6]),
        min_frames_between_hits: LittleEndian::read_u16(&raw[6..8]),
    };
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_fixed() {
        let s = DetectionSettings {
            auto_exposure_level: -2,
            brightness_threshold: 240,
            max_spot_size: 0x0102,
            min_brightness_change: 35,
            min_frames_between_hits: 7,
        };
        // max_spot_size out of range is fine for encoding, decoding rejects it
        assert_eq!(
            encode_settings(&s),
            [1, 0xFE, 240, 35, 0x02, 0x01, 7, 0]
        );
    }

    #[test]
    fn decodes_what_it_encodes() {
        let s = DetectionSettings {
            auto_exposure_level: 2,
            brightness_threshold: 250,
            max_spot_size: 200,
            min_brightness_change: 0,
            min_frames_between_hits: 100,
        };
        assert_eq!(decode_settings(&encode_settings(&s)), Ok(s));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let bytes = encode_settings(&DetectionSettings::default());
        assert_eq!(
            decode_settings(&bytes[..7]),
            Err(CodecError::WrongLength {
                expected: 8,
                got: 7
            })
        );
        // the old raw-struct layout was five 32-bit ints
        assert!(matches!(
            decode_settings(&[0u8; 20]),
            Err(CodecError::WrongLength { got: 20, .. })
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut bytes = encode_settings(&DetectionSettings::default());
        bytes[0] = 9;
        assert_eq!(
            decode_settings(&bytes),
            Err(CodecError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let mut bytes = encode_settings(&DetectionSettings::default());
        bytes[6] = 0; // min_frames_between_hits = 0
        assert!(matches!(
            decode_settings(&bytes),
            Err(CodecError::Invalid(SettingsError {
                field: "min_frames_between_hits",
                ..
            }))
        ));
    }
}
