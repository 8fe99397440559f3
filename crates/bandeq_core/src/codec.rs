//! Persisted Setting Encoding
//!
//! Each piece of equalizer state lives under its own string key. Decoding is
//! a typed step that either yields a usable value or a [`DecodeError`], so a
//! bad key can be skipped without touching the others.

use bandeq_dsp::{clamp_gains, GainVector, BAND_COUNT};
use thiserror::Error;

/// Enabled flag, JSON boolean
pub const ENABLED_KEY: &str = "eq_enabled";

/// Gain vector, JSON array of 8 numbers
pub const BANDS_KEY: &str = "eq_bands";

/// Current preset name, plain string
pub const PRESET_KEY: &str = "eq_preset";

/// Last hand-edited curve, JSON array of 8 numbers
pub const CUSTOM_PRESET_KEY: &str = "eq_custom_preset";

/// Why a persisted value could not be used
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected {expected} band gains, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("empty preset name")]
    EmptyName,
}

pub fn encode_enabled(enabled: bool) -> String {
    enabled.to_string()
}

pub fn decode_enabled(raw: &str) -> Result<bool, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn encode_gains(gains: &GainVector) -> Result<String, serde_json::Error> {
    serde_json::to_string(gains)
}

/// Decode a gain vector, clamping each value into the band range
pub fn decode_gains(raw: &str) -> Result<GainVector, DecodeError> {
    let values: Vec<f32> = serde_json::from_str(raw)?;
    let gains: GainVector = values
        .as_slice()
        .try_into()
        .map_err(|_| DecodeError::WrongLength {
            expected: BAND_COUNT,
            got: values.len(),
        })?;
    Ok(clamp_gains(&gains))
}

pub fn decode_preset_name(raw: &str) -> Result<String, DecodeError> {
    if raw.trim().is_empty() {
        return Err(DecodeError::EmptyName);
    }
    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_round_trip() {
        assert!(decode_enabled(&encode_enabled(true)).unwrap());
        assert!(!decode_enabled(&encode_enabled(false)).unwrap());
        assert!(decode_enabled("yes").is_err());
        assert!(decode_enabled("1").is_err());
    }

    #[test]
    fn test_gains_round_trip() {
        let gains = [2.0, -2.0, 0.0, 0.0, 0.5, 0.0, 0.0, -12.0];
        let encoded = encode_gains(&gains).unwrap();
        assert_eq!(decode_gains(&encoded).unwrap(), gains);
    }

    #[test]
    fn test_decode_gains_accepts_integers() {
        let gains = decode_gains("[1, 2, 3, 4, 5, 6, 7, 8]").unwrap();
        assert_eq!(gains, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_decode_gains_clamps() {
        let gains = decode_gains("[20, -20, 0, 0, 0, 0, 0, 0]").unwrap();
        assert_eq!(gains[0], 12.0);
        assert_eq!(gains[1], -12.0);
    }

    #[test]
    fn test_decode_gains_wrong_length() {
        assert!(matches!(
            decode_gains("[1, 2, 3]"),
            Err(DecodeError::WrongLength { expected: 8, got: 3 })
        ));
        assert!(matches!(
            decode_gains("[0, 0, 0, 0, 0, 0, 0, 0, 0]"),
            Err(DecodeError::WrongLength { got: 9, .. })
        ));
    }

    #[test]
    fn test_decode_gains_malformed() {
        assert!(matches!(decode_gains("[1, 2,"), Err(DecodeError::Json(_))));
        assert!(matches!(decode_gains("{\"a\": 1}"), Err(DecodeError::Json(_))));
        assert!(matches!(
            decode_gains("[1, \"x\", 0, 0, 0, 0, 0, 0]"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_decode_preset_name() {
        assert_eq!(decode_preset_name("Rock").unwrap(), "Rock");
        assert!(matches!(decode_preset_name("  "), Err(DecodeError::EmptyName)));
    }
}
