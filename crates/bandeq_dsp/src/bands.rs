//! Band Layout
//!
//! The equalizer has a fixed set of 8 peaking bands. Frequencies, the gain
//! range and the band Q are process-wide constants.

use serde::{Deserialize, Serialize};

/// Number of bands in the chain
pub const BAND_COUNT: usize = 8;

/// Center frequencies (Hz), in chain order
pub const BAND_FREQUENCIES: [f32; BAND_COUNT] = [
    60.0,    // Sub-bass
    150.0,   // Bass
    400.0,   // Low-mid
    1000.0,  // Mid
    2400.0,  // Upper-mid
    6000.0,  // Presence
    12000.0, // Brilliance
    15000.0, // Air
];

/// Lowest gain a band accepts (dB)
pub const MIN_GAIN_DB: f32 = -12.0;

/// Highest gain a band accepts (dB)
pub const MAX_GAIN_DB: f32 = 12.0;

/// Bandwidth of every peaking filter
pub const BAND_Q: f32 = 1.0;

/// One gain per band, in dB
pub type GainVector = [f32; BAND_COUNT];

/// The neutral curve
pub const FLAT_GAINS: GainVector = [0.0; BAND_COUNT];

/// Clamp a gain into `[MIN_GAIN_DB, MAX_GAIN_DB]`.
///
/// NaN has no meaningful position on the curve and maps to 0 dB.
pub fn clamp_gain(gain_db: f32) -> f32 {
    if gain_db.is_nan() {
        return 0.0;
    }
    gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
}

/// Clamp every element of a gain vector
pub fn clamp_gains(gains: &GainVector) -> GainVector {
    core::array::from_fn(|i| clamp_gain(gains[i]))
}

/// True if any band deviates from 0 dB
pub fn is_modified(gains: &GainVector) -> bool {
    gains.iter().any(|&gain| gain != 0.0)
}

/// A single band as presented to a UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub index: usize,
    pub frequency: f32,
    pub gain_db: f32,
}

impl Band {
    /// Build the band records for a gain vector
    pub fn all(gains: &GainVector) -> [Band; BAND_COUNT] {
        core::array::from_fn(|index| Band {
            index,
            frequency: BAND_FREQUENCIES[index],
            gain_db: gains[index],
        })
    }

    /// Short frequency label, e.g. "150" or "2.4k"
    pub fn label(&self) -> String {
        format_frequency(self.frequency)
    }
}

/// Format a frequency for slider labels (1000 -> "1k", 2400 -> "2.4k")
pub fn format_frequency(frequency: f32) -> String {
    if frequency >= 1000.0 {
        format!("{}k", frequency / 1000.0)
    } else {
        format!("{}", frequency)
    }
}
