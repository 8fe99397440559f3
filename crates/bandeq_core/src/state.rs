//! UI State Snapshot
//!
//! Everything a slider panel needs to render, in one serializable value.

use bandeq_dsp::{is_modified, Band, GainVector, BAND_COUNT};
use serde::{Deserialize, Serialize};

/// Snapshot of the controller state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerState {
    pub enabled: bool,
    pub bands: [Band; BAND_COUNT],
    pub current_preset: String,
    pub is_modified: bool,
    pub available_presets: Vec<String>,
}

impl EqualizerState {
    pub fn new(
        enabled: bool,
        gains: &GainVector,
        current_preset: &str,
        available_presets: Vec<&str>,
    ) -> Self {
        Self {
            enabled,
            bands: Band::all(gains),
            current_preset: current_preset.to_string(),
            is_modified: is_modified(gains),
            available_presets: available_presets.into_iter().map(String::from).collect(),
        }
    }

    /// Gains in band order
    pub fn gains(&self) -> GainVector {
        core::array::from_fn(|i| self.bands[i].gain_db)
    }
}
