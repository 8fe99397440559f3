//! EQ Presets
//!
//! The built-in catalog plus a validated container for externally supplied
//! catalogs. Lookups of unknown names fall back to the first entry.

use serde::{Deserialize, Serialize};

use crate::bands::{GainVector, MAX_GAIN_DB, MIN_GAIN_DB};
use crate::error::DspError;

/// Name of the neutral preset
pub const FLAT: &str = "Flat";

/// Reserved name for a hand-edited curve
pub const CUSTOM: &str = "Custom";

/// Built-in presets, 8 band gains each
pub const PRESETS: &[(&str, GainVector)] = &[
    (FLAT, [0.0; 8]),
    ("Rock", [5.0, 3.0, -1.0, -2.0, 0.0, 2.0, 4.0, 5.0]),
    ("Jazz", [4.0, 3.0, 1.0, 1.0, -1.0, -1.0, 0.0, 2.0]),
    ("Pop", [-1.0, 2.0, 4.0, 4.0, 2.0, -1.0, -2.0, -2.0]),
    ("Classical", [5.0, 3.0, -1.0, -2.0, -2.0, 0.0, 2.0, 3.0]),
    ("Electronic", [4.0, 3.0, 0.0, -2.0, 1.0, 0.0, 3.0, 5.0]),
    ("Podcast", [-2.0, 0.0, 3.0, 5.0, 5.0, 3.0, 0.0, -2.0]), // Voice forward
    ("Acoustic", [5.0, 2.0, 0.0, 1.0, 2.0, 2.0, 3.0, 1.0]),
    ("Bass Boost", [8.0, 6.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("Treble Boost", [0.0, 0.0, 0.0, 0.0, 0.0, 4.0, 6.0, 8.0]),
];

/// A named gain curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub gains: GainVector,
}

impl Preset {
    pub fn new(name: impl Into<String>, gains: GainVector) -> Self {
        Self {
            name: name.into(),
            gains,
        }
    }

    fn validate(&self) -> Result<(), DspError> {
        if self.name.trim().is_empty() {
            return Err(DspError::InvalidPreset("preset name is empty".into()));
        }
        if self.name == CUSTOM {
            return Err(DspError::InvalidPreset(format!(
                "\"{}\" is reserved for hand-edited curves",
                CUSTOM
            )));
        }
        for gain in self.gains {
            if !gain.is_finite() || !(MIN_GAIN_DB..=MAX_GAIN_DB).contains(&gain) {
                return Err(DspError::InvalidPreset(format!(
                    "{}: gain {} is outside {}..={} dB",
                    self.name, gain, MIN_GAIN_DB, MAX_GAIN_DB
                )));
            }
        }
        Ok(())
    }
}

/// An ordered, non-empty list of presets
///
/// The first entry is the default returned for unknown names.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetCatalog {
    /// The built-in catalog, starting with "Flat"
    pub fn builtin() -> Self {
        Self {
            presets: PRESETS
                .iter()
                .map(|&(name, gains)| Preset::new(name, gains))
                .collect(),
        }
    }

    /// Build a catalog from external entries
    pub fn new(presets: Vec<Preset>) -> Result<Self, DspError> {
        if presets.is_empty() {
            return Err(DspError::InvalidPreset("catalog is empty".into()));
        }
        for (i, preset) in presets.iter().enumerate() {
            preset.validate()?;
            if presets[..i].iter().any(|other| other.name == preset.name) {
                return Err(DspError::InvalidPreset(format!(
                    "duplicate preset name: {}",
                    preset.name
                )));
            }
        }
        Ok(Self { presets })
    }

    /// Exact lookup
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.name == name)
    }

    /// Lookup falling back to the default preset
    pub fn lookup(&self, name: &str) -> &Preset {
        self.get(name).unwrap_or(&self.presets[0])
    }

    pub fn default_preset(&self) -> &Preset {
        &self.presets[0]
    }

    /// Preset names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|preset| preset.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
